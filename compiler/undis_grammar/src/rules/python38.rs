//! 3.8 over 3.7: loops lose their `SETUP_LOOP` block, `break` becomes a
//! jump, and `try` is set up with `SETUP_FINALLY`.

use super::Delta;

pub(crate) const PYTHON38: Delta = Delta {
    remove: r"
whilestmt ::= SETUP_LOOP testexpr stmts JUMP_BACK come_froms POP_BLOCK COME_FROM_LOOP
while1stmt ::= SETUP_LOOP stmts JUMP_BACK POP_BLOCK COME_FROM_LOOP
forstmt ::= SETUP_LOOP expr GET_ITER FOR_ITER store stmts JUMP_BACK POP_BLOCK COME_FROM_LOOP
break ::= BREAK_LOOP
continue ::= CONTINUE_LOOP
try_except ::= SETUP_EXCEPT stmts POP_BLOCK JUMP_FORWARD COME_FROM_EXCEPT except_handlers END_FINALLY come_froms
",
    add: r"
whilestmt ::= testexpr stmts JUMP_BACK come_froms
while1stmt ::= stmts JUMP_BACK come_froms
forstmt ::= expr GET_ITER FOR_ITER store stmts JUMP_BACK come_froms
break ::= JUMP_ABSOLUTE
break ::= POP_TOP JUMP_ABSOLUTE
try_except ::= SETUP_FINALLY stmts POP_BLOCK JUMP_FORWARD COME_FROM_FINALLY except_handlers END_FINALLY come_froms
",
};
