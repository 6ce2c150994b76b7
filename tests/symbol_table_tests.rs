use midc::analyzer::{Kind, Scope, ScopedSymbolTable, StringTable, SymbolTable, Type};

#[test]
fn test_local_shadows_global() {
    let mut symbols = ScopedSymbolTable::new();
    symbols.declare("x", Kind::Variable, Type::Int, Scope::Global);
    symbols.declare("x", Kind::Variable, Type::Char, Scope::Local);

    assert_eq!(symbols.lookup_nearest("x").unwrap().ty, Type::Char);
    assert_eq!(symbols.scope_of("x"), Some(Scope::Local));
    assert_eq!(symbols.lookup("x", Scope::Global).unwrap().ty, Type::Int);

    symbols.reset(Scope::Local);
    assert_eq!(symbols.lookup_nearest("x").unwrap().ty, Type::Int);
    assert_eq!(symbols.scope_of("x"), Some(Scope::Global));
    assert_eq!(symbols.scope_of("y"), None);
    assert_eq!(Scope::Local.level(), Scope::Global.level() + 1);
}

#[test]
fn test_redeclaration_replaces_symbol() {
    let mut table = SymbolTable::new();
    table.declare("n", Kind::Const, Type::Int).const_value = Some("3".to_string());
    table.declare("n", Kind::Array, Type::Char).array_length = Some(4);

    assert_eq!(table.len(), 1);
    let n = table.get("n").unwrap();
    assert_eq!(n.kind, Kind::Array);
    assert_eq!(n.ty, Type::Char);
    assert_eq!(n.const_value, None);
    assert_eq!(n.array_length, Some(4));
}

#[test]
fn test_function_signature() {
    let mut symbols = ScopedSymbolTable::new();
    symbols.declare("f", Kind::Function, Type::Int, Scope::Global);
    symbols.declare("v", Kind::Variable, Type::Int, Scope::Global);
    let f = symbols.lookup_mut("f", Scope::Global).unwrap();
    f.add_parameter(Type::Int);
    f.add_parameter(Type::Char);

    let f = symbols.lookup_function("f").unwrap();
    assert_eq!(f.parameters, "01");
    assert_eq!(f.parameter_count(), 2);
    assert_eq!(f.parameter_types(), vec![Type::Int, Type::Char]);
    assert!(symbols.lookup_function("v").is_none());
}

#[test]
fn test_snapshot_is_detached() {
    let mut symbols = ScopedSymbolTable::new();
    symbols.declare("a", Kind::Parameter, Type::Int, Scope::Local);
    let snapshot = symbols.snapshot(Scope::Local);
    symbols.reset(Scope::Local);

    assert!(symbols.lookup("a", Scope::Local).is_none());
    assert_eq!(snapshot.get("a").unwrap().kind, Kind::Parameter);
}

#[test]
fn test_string_table_never_deduplicates() {
    let mut strings = StringTable::new();
    assert_eq!(strings.intern("hi"), 0);
    assert_eq!(strings.intern("hi"), 1);
    assert_eq!(strings.resolve(1), Some("hi"));
    assert_eq!(strings.resolve(2), None);
    assert_eq!(strings.len(), 2);
}
