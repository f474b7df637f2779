use pretty_assertions::assert_eq;

use super::*;

#[test]
fn join_markers_sort_before_their_instruction() {
    let target = Offset::extended(20, 22);
    let first = Offset::join_marker(target, 0);
    let second = Offset::join_marker(target, 1);
    let before = Offset::at(18);

    let mut offsets = vec![target, second, before, first];
    offsets.sort();
    assert_eq!(offsets, vec![before, first, second, target]);
}

#[test]
fn offset_display_shows_prefix_and_marker_index() {
    assert_eq!(Offset::at(8).to_string(), "8");
    assert_eq!(Offset::extended(8, 10).to_string(), "8_10");
    assert_eq!(Offset::join_marker(Offset::at(8), 1).to_string(), "8.1");
}

#[test]
fn backward_jumps_are_recognised() {
    let back = Token::new("JUMP_ABSOLUTE", "JUMP_ABSOLUTE", Offset::at(30))
        .with_attr(Attr::Jump(4), "4");
    let fwd = Token::new("JUMP_FORWARD", "JUMP_FORWARD", Offset::at(30))
        .with_attr(Attr::Jump(40), "to 40");
    assert!(back.is_jump_back());
    assert!(!fwd.is_jump_back());
    assert_eq!(fwd.jump_target(), Some(40));
}

#[test]
fn token_display_is_a_listing_line() {
    let tok = Token::new("LOAD_NAME", "LOAD_NAME", Offset::at(2))
        .with_attr(Attr::Name("x".into()), "x");
    assert_eq!(tok.to_string(), "        2  LOAD_NAME                x");
    let bare = Token::new("POP_TOP", "POP_TOP", Offset::at(4));
    assert_eq!(bare.to_string(), "        4  POP_TOP");
}
