use super::*;

#[test]
fn parses_dotted_versions() {
    assert_eq!("3.7".parse::<Version>(), Ok(Version::V3_7));
    assert_eq!(" 3 . 8 ".parse::<Version>(), Ok(Version::V3_8));
    assert!("38".parse::<Version>().is_err());
    assert!("3.x".parse::<Version>().is_err());
}

#[test]
fn only_three_seven_and_three_eight_are_supported() {
    assert!(Version::V3_7.is_supported());
    assert!(Version::V3_8.is_supported());
    assert!(!Version::new(3, 9).is_supported());
    assert!(!Version::new(2, 7).is_supported());
}

#[test]
fn versions_order_numerically() {
    assert!(Version::V3_7 < Version::V3_8);
    assert!(Version::new(3, 10) > Version::V3_8);
}
