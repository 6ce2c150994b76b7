mod common;

use common::{compile, scan, trace_lines, wrap_in_main};
use midc::analyzer::{Kind, Type};
use midc::midcode::{Midcode, Operand, Reg};
use midc::parser::{Rule, GLOBAL_TABLE};
use midc::{compile_with_trace, ParseError};

fn body_trace(body: &str) -> Vec<String> {
    let compilation = compile(&wrap_in_main(body));
    assert!(compilation.diagnostics.is_empty(), "{:?}", compilation.diagnostics);
    let lines = trace_lines(&compilation);
    // drop "void main()" and the trailing "return" / "function end"
    lines[1..lines.len() - 2].to_vec()
}

#[test]
fn test_multiplication_chain_uses_one_register() {
    let compilation = compile(&wrap_in_main("int a, b, c, d;\nd = a * b * c;"));
    assert_eq!(
        trace_lines(&compilation),
        vec![
            "void main()",
            "variable int a",
            "variable int b",
            "variable int c",
            "variable int d",
            "#0 = a * b",
            "#0 = #0 * c",
            "d = #0",
            "return",
            "function end",
        ]
    );
    assert_eq!(compilation.reg_count, 1);
}

#[test]
fn test_mixed_precedence() {
    assert_eq!(
        body_trace("int a, b, c, d;\nd = a * b + c * d - 1;"),
        vec![
            "variable int a",
            "variable int b",
            "variable int c",
            "variable int d",
            "#0 = a * b",
            "#1 = c * d",
            "#2 = #0 + #1",
            "#2 = #2 - 1",
            "d = #2",
        ]
    );
}

#[test]
fn test_constants_and_signed_literals() {
    let compilation = compile(
        "const int N = 10, M = -2;\nconst char C = 'z';\nvoid main() {\nint x;\nx = N + M;\nx = -5;\nx = -x;\nprintf(C);\n}",
    );
    assert!(compilation.diagnostics.is_empty(), "{:?}", compilation.diagnostics);
    let lines = trace_lines(&compilation);
    assert_eq!(
        lines[2..9],
        [
            "#0 = 10 + -2",
            "x = #0",
            "x = -5",
            "#1 = -x",
            "x = #1",
            "printf char 'z'",
            "printf_end",
        ]
    );

    let global = compilation.symbol_table(GLOBAL_TABLE).unwrap();
    assert_eq!(global.get("M").unwrap().const_value.as_deref(), Some("-2"));
    assert_eq!(global.get("C").unwrap().const_value.as_deref(), Some("'z'"));
}

#[test]
fn test_if_else_labels() {
    assert_eq!(
        body_trace("int a;\nif (a < 3) a = 1;\nelse a = 2;"),
        vec![
            "variable int a",
            "bge a 3 Label_0",
            "a = 1",
            "jump Label_1",
            "Label_0:",
            "a = 2",
            "Label_1:",
        ]
    );
}

#[test]
fn test_loops() {
    assert_eq!(
        body_trace("int a;\nwhile (a) a = 0;"),
        vec![
            "variable int a",
            "Label_0:",
            "bez a Label_1",
            "a = 0",
            "jump Label_0",
            "Label_1:",
        ]
    );
    assert_eq!(
        body_trace("int a;\ndo a = a + 1; while (a != 3)"),
        vec!["variable int a", "Label_0:", "#0 = a + 1", "a = #0", "bne a 3 Label_0"]
    );
}

#[test]
fn test_for_step_follows_body() {
    assert_eq!(
        body_trace("int i;\nfor (i = 0; i < 10; i = i + 2) printf(i);"),
        vec![
            "variable int i",
            "i = 0",
            "Label_0:",
            "bge i 10 Label_1",
            "printf int i",
            "printf_end",
            "i = i + 2",
            "jump Label_0",
            "Label_1:",
        ]
    );
}

#[test]
fn test_call_and_counters_across_functions() {
    let compilation = compile(
        "int add(int x, int y) {\nreturn (x + y);\n}\nvoid main() {\nint r;\nr = add(1, 2);\n}",
    );
    assert!(compilation.diagnostics.is_empty(), "{:?}", compilation.diagnostics);
    assert_eq!(
        trace_lines(&compilation),
        vec![
            "int add()",
            "parameter int x",
            "parameter int y",
            "#0 = x + y",
            "return #0",
            "function end",
            "void main()",
            "variable int r",
            "save add",
            "push 1",
            "push 2",
            "call add",
            "#1 = RET",
            "r = #1",
            "return",
            "function end",
        ]
    );
    assert_eq!(compilation.reg_count, 2);

    let add = compilation.symbol_table(GLOBAL_TABLE).unwrap().get("add").unwrap();
    assert_eq!(add.kind, Kind::Function);
    assert_eq!(add.parameters, "00");
    let locals = compilation.symbol_table("add").unwrap();
    assert_eq!(locals.get("y").unwrap().kind, Kind::Parameter);
    assert!(compilation.symbol_table("main").unwrap().get("r").is_some());
}

#[test]
fn test_array_access() {
    assert_eq!(
        body_trace("int a[4], i, b;\na[i] = 1;\nb = a[i + 1];"),
        vec![
            "variable int a[4]",
            "variable int i",
            "variable int b",
            "a[i] = 1",
            "#0 = i + 1",
            "#1 = a[#0]",
            "b = #1",
        ]
    );
}

#[test]
fn test_printf_and_scanf() {
    let compilation = compile(&wrap_in_main(
        "int a;\nchar c;\nscanf(a, c);\nprintf(\"a=\", a);\nprintf(\"done\");\nprintf(c);",
    ));
    assert!(compilation.diagnostics.is_empty(), "{:?}", compilation.diagnostics);
    assert_eq!(
        trace_lines(&compilation)[3..12],
        [
            "scanf int a",
            "scanf char c",
            "printf str_0",
            "printf int a",
            "printf_end",
            "printf str_1",
            "printf char c",
            "printf_end",
            "return",
        ]
    );
    assert_eq!(compilation.strings.resolve(0), Some("a="));
    assert_eq!(compilation.strings.resolve(1), Some("done"));
}

#[test]
fn test_local_shadows_global() {
    let compilation = compile("int x;\nvoid main() {\nchar x;\nprintf(x);\n}");
    assert!(compilation.diagnostics.is_empty(), "{:?}", compilation.diagnostics);
    assert!(compilation.trace().contains("printf char x\n"));
    assert_eq!(
        compilation.symbol_table(GLOBAL_TABLE).unwrap().get("x").unwrap().ty,
        Type::Int
    );
}

#[test]
fn test_trace_sink_receives_every_instruction() {
    let mut trace = vec![];
    let compilation =
        compile_with_trace(scan(&wrap_in_main("int a;\na = 1 + 2;")), &mut trace).unwrap();
    assert_eq!(String::from_utf8(trace).unwrap(), compilation.trace());
    assert_eq!(
        compilation.midcode[2],
        Midcode::Arith {
            op: midc::midcode::ArithOp::Add,
            dst: Reg(0),
            lhs: Operand::named("1"),
            rhs: Operand::named("2"),
        }
    );
}

#[test]
fn test_syntax_tree_annotations() {
    let compilation = compile(&wrap_in_main("int a;\na = a * 2;"));
    let tree = &compilation.tree;
    assert_eq!(tree.rule(), Some(Rule::Program));
    assert_eq!(tree.count(Rule::MainFunction), 1);
    assert_eq!(tree.count(Rule::Factor), 2);

    let assign = tree.find(Rule::AssignSentence).unwrap();
    let expr = assign.find(Rule::Expression).unwrap();
    assert_eq!(expr.operand(), Some(&Operand::Reg(Reg(0))));
    let values: Vec<_> = assign.tokens().into_iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["a", "=", "a", "*", "2"]);
}

#[test]
fn test_end_of_stream_is_fatal() {
    let Err(ParseError::UnexpectedEof { .. }) = midc::compile(scan("void main() {\nint a;")) else {
        panic!();
    };
    let Err(ParseError::UnexpectedToken { line, found, .. }) =
        midc::compile(scan(&wrap_in_main("int a;\na = ;")))
    else {
        panic!();
    };
    assert_eq!(line, 3);
    assert_eq!(found, "SEMICN");
}

#[test]
fn test_void_call_result_is_int() {
    let compilation = compile("void f() {\n}\nvoid main() {\nprintf(f());\n}");
    assert!(compilation.diagnostics.is_empty(), "{:?}", compilation.diagnostics);
    assert!(compilation.trace().contains("call f\n#0 = RET\nprintf int #0\n"));
}
