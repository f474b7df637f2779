//! The base rule set, for 3.7 wordcode.

pub(crate) const PYTHON37: &str = r"
# Start symbols
module ::= stmts return_last
module ::= return_last
module ::= stmts
return_last ::= LOAD_CONST RETURN_LAST
lambda_start ::= expr RETURN_VALUE
lambda_start ::= expr RETURN_LAST

stmts ::= stmts stmt
stmts ::= stmt

come_froms ::= come_froms COME_FROM
come_froms ::=

stmt ::= expr_stmt
stmt ::= assign
stmt ::= assign2
stmt ::= swap_assign
stmt ::= aug_assign1
stmt ::= aug_assign2
stmt ::= aug_assign3
stmt ::= del_stmt
stmt ::= return
stmt ::= raise_stmt0
stmt ::= raise_stmt1
stmt ::= raise_stmt2
stmt ::= import
stmt ::= import_from
stmt ::= import_star
stmt ::= ifstmt
stmt ::= ifelsestmt
stmt ::= ifelsestmtc
stmt ::= whilestmt
stmt ::= while1stmt
stmt ::= forstmt
stmt ::= break
stmt ::= continue
stmt ::= try_except
stmt ::= function_def
stmt ::= classdef

# Simple statements
expr_stmt ::= expr POP_TOP
assign ::= expr store
assign2 ::= expr DUP_TOP store store
swap_assign ::= expr expr ROT_TWO store store
aug_assign1 ::= expr expr inplace_op store
aug_assign2 ::= expr DUP_TOP LOAD_ATTR expr inplace_op ROT_TWO STORE_ATTR
aug_assign3 ::= expr expr DUP_TOP_TWO BINARY_SUBSCR expr inplace_op ROT_THREE STORE_SUBSCR

store ::= STORE_NAME
store ::= STORE_FAST
store ::= STORE_GLOBAL
store ::= STORE_DEREF
store ::= expr STORE_ATTR
store ::= expr expr STORE_SUBSCR
store ::= unpack

del_stmt ::= DELETE_NAME
del_stmt ::= DELETE_FAST
del_stmt ::= DELETE_GLOBAL
del_stmt ::= DELETE_DEREF
del_stmt ::= expr DELETE_ATTR
del_stmt ::= expr expr DELETE_SUBSCR

return ::= expr RETURN_VALUE
raise_stmt0 ::= RAISE_VARARGS_0
raise_stmt1 ::= expr RAISE_VARARGS_1
raise_stmt2 ::= expr expr RAISE_VARARGS_2

import ::= LOAD_CONST LOAD_CONST IMPORT_NAME store
import_from ::= LOAD_CONST LOAD_CONST IMPORT_NAME import_froms POP_TOP
import_froms ::= import_froms import_from_item
import_froms ::= import_from_item
import_from_item ::= IMPORT_FROM store
import_star ::= LOAD_CONST LOAD_CONST IMPORT_NAME IMPORT_STAR

function_def ::= mkfunc store
classdef ::= build_class store

# Conditions
testexpr ::= testfalse
testexpr ::= testtrue
testfalse ::= expr POP_JUMP_IF_FALSE
testfalse ::= and_conds expr POP_JUMP_IF_FALSE
testfalse ::= or_conds expr POP_JUMP_IF_FALSE COME_FROM come_froms
testtrue ::= expr POP_JUMP_IF_TRUE
and_conds ::= and_conds and_cond
and_conds ::= and_cond
and_cond ::= expr POP_JUMP_IF_FALSE
or_conds ::= or_conds or_cond
or_conds ::= or_cond
or_cond ::= expr POP_JUMP_IF_TRUE

ifstmt ::= testexpr stmts come_froms
ifstmt ::= testexpr stmts JUMP_FORWARD come_froms
ifelsestmt ::= testexpr stmts JUMP_FORWARD come_froms stmts come_froms
ifelsestmtc ::= testexpr stmts JUMP_BACK come_froms stmts

# Loops, block-structured
whilestmt ::= SETUP_LOOP testexpr stmts JUMP_BACK come_froms POP_BLOCK COME_FROM_LOOP
while1stmt ::= SETUP_LOOP stmts JUMP_BACK POP_BLOCK COME_FROM_LOOP
forstmt ::= SETUP_LOOP expr GET_ITER FOR_ITER store stmts JUMP_BACK POP_BLOCK COME_FROM_LOOP
break ::= BREAK_LOOP
continue ::= JUMP_BACK
continue ::= CONTINUE_LOOP

# Exceptions
try_except ::= SETUP_EXCEPT stmts POP_BLOCK JUMP_FORWARD COME_FROM_EXCEPT except_handlers END_FINALLY come_froms
except_handlers ::= except_handlers except_handler
except_handlers ::= except_handler
except_handler ::= except_cond stmts POP_EXCEPT JUMP_FORWARD come_froms
except_handler ::= except_bare stmts POP_EXCEPT JUMP_FORWARD come_froms
except_cond ::= DUP_TOP expr COMPARE_OP POP_JUMP_IF_FALSE POP_TOP POP_TOP POP_TOP
except_bare ::= POP_TOP POP_TOP POP_TOP

# Expressions
expr ::= LOAD_CONST
expr ::= LOAD_STR
expr ::= LOAD_NAME
expr ::= LOAD_FAST
expr ::= LOAD_GLOBAL
expr ::= LOAD_DEREF
expr ::= LOAD_CLASSDEREF
expr ::= LOAD_ASSERT
expr ::= attribute
expr ::= subscript
expr ::= slice
expr ::= binary_expr
expr ::= unary_expr
expr ::= unary_not
expr ::= compare
expr ::= and
expr ::= or
expr ::= if_exp
expr ::= call
expr ::= call_kw
expr ::= call_method
expr ::= call_ex
expr ::= call_ex_kw
expr ::= list
expr ::= tuple
expr ::= set
expr ::= dict
expr ::= dict_const
expr ::= list_unpack
expr ::= set_unpack
expr ::= tuple_unpack
expr ::= dict_unpack
expr ::= unpack_args
expr ::= unpack_kwargs
expr ::= joined_str
expr ::= formatted_value
expr ::= formatted_value_attr
expr ::= yield
expr ::= mklambda
expr ::= listcomp
expr ::= setcomp
expr ::= dictcomp
expr ::= genexpr

attribute ::= expr LOAD_ATTR
subscript ::= expr expr BINARY_SUBSCR
binary_expr ::= expr expr binary_op
unary_expr ::= expr unary_op
unary_not ::= expr UNARY_NOT
compare ::= expr expr COMPARE_OP
and ::= expr JUMP_IF_FALSE_OR_POP expr COME_FROM
or ::= expr JUMP_IF_TRUE_OR_POP expr COME_FROM
if_exp ::= expr POP_JUMP_IF_FALSE expr JUMP_FORWARD COME_FROM expr COME_FROM
call_ex ::= expr expr CALL_FUNCTION_EX
call_ex_kw ::= expr expr expr CALL_FUNCTION_EX_KW
formatted_value ::= expr FORMAT_VALUE
formatted_value_attr ::= expr expr FORMAT_VALUE_ATTR
yield ::= expr YIELD_VALUE

list ::= COLLECTION_START add_consts BUILD_LIST
tuple ::= COLLECTION_START add_consts BUILD_TUPLE
set ::= COLLECTION_START add_consts BUILD_SET
add_consts ::= add_consts ADD_VALUE
add_consts ::= ADD_VALUE

binary_op ::= BINARY_ADD
binary_op ::= BINARY_SUBTRACT
binary_op ::= BINARY_MULTIPLY
binary_op ::= BINARY_MATRIX_MULTIPLY
binary_op ::= BINARY_TRUE_DIVIDE
binary_op ::= BINARY_FLOOR_DIVIDE
binary_op ::= BINARY_MODULO
binary_op ::= BINARY_POWER
binary_op ::= BINARY_LSHIFT
binary_op ::= BINARY_RSHIFT
binary_op ::= BINARY_AND
binary_op ::= BINARY_XOR
binary_op ::= BINARY_OR

inplace_op ::= INPLACE_ADD
inplace_op ::= INPLACE_SUBTRACT
inplace_op ::= INPLACE_MULTIPLY
inplace_op ::= INPLACE_MATRIX_MULTIPLY
inplace_op ::= INPLACE_TRUE_DIVIDE
inplace_op ::= INPLACE_FLOOR_DIVIDE
inplace_op ::= INPLACE_MODULO
inplace_op ::= INPLACE_POWER
inplace_op ::= INPLACE_LSHIFT
inplace_op ::= INPLACE_RSHIFT
inplace_op ::= INPLACE_AND
inplace_op ::= INPLACE_XOR
inplace_op ::= INPLACE_OR

unary_op ::= UNARY_POSITIVE
unary_op ::= UNARY_NEGATIVE
unary_op ::= UNARY_INVERT

# Comprehension bodies
comp_func ::= BUILD_LIST_0 LOAD_FAST FOR_ITER store comp_iter JUMP_BACK RETURN_VALUE
comp_func ::= BUILD_SET_0 LOAD_FAST FOR_ITER store comp_iter JUMP_BACK RETURN_VALUE
comp_func ::= BUILD_MAP_0 LOAD_FAST FOR_ITER store comp_iter JUMP_BACK RETURN_VALUE
comp_func ::= LOAD_FAST FOR_ITER store comp_iter JUMP_BACK return_last
comp_iter ::= comp_if
comp_iter ::= comp_if_not
comp_iter ::= comp_for
comp_iter ::= comp_body
comp_if ::= expr POP_JUMP_IF_FALSE comp_iter
comp_if_not ::= expr POP_JUMP_IF_TRUE comp_iter
comp_for ::= expr GET_ITER FOR_ITER store comp_iter JUMP_BACK
comp_body ::= expr LIST_APPEND
comp_body ::= expr SET_ADD
comp_body ::= expr expr MAP_ADD
comp_body ::= expr YIELD_VALUE POP_TOP
";
