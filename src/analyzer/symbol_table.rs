use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Const,
    Variable,
    Array,
    Parameter,
    Function,
}

/// Level 0 holds functions and global declarations, level 1 the locals of
/// the function currently being analyzed. There is no deeper nesting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

impl Scope {
    pub fn level(&self) -> usize {
        match self {
            Scope::Global => 0,
            Scope::Local => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: Kind,
    pub ty: Type,
    pub const_value: Option<String>,
    pub array_length: Option<usize>,
    /// Parameter types of a function, one signature code per parameter.
    pub parameters: String,
}

impl Symbol {
    pub fn new(name: &str, kind: Kind, ty: Type) -> Self {
        Self {
            name: name.to_string(),
            kind,
            ty,
            const_value: None,
            array_length: None,
            parameters: String::new(),
        }
    }

    pub fn add_parameter(&mut self, ty: Type) {
        self.parameters.push(ty.signature_code());
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter_types(&self) -> Vec<Type> {
        self.parameters
            .chars()
            .filter_map(Type::from_signature_code)
            .collect()
    }

    pub fn is_function(&self) -> bool {
        self.kind == Kind::Function
    }
}

/// One scope level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolTable {
    table: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a fresh symbol for `name`, replacing whatever was there.
    pub fn declare(&mut self, name: &str, kind: Kind, ty: Type) -> &mut Symbol {
        let symbol = Symbol::new(name, kind, ty);
        match self.table.entry(name.to_string()) {
            Entry::Occupied(mut e) => {
                e.insert(symbol);
                e.into_mut()
            }
            Entry::Vacant(e) => e.insert(symbol),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.table.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.table.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.table.values()
    }
}

/// The two active scope levels. Only mechanism lives here: detecting a
/// redefinition is up to the caller, who looks up before declaring.
#[derive(Clone, Debug, Default)]
pub struct ScopedSymbolTable {
    global: SymbolTable,
    local: SymbolTable,
}

impl ScopedSymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn level(&self, scope: Scope) -> &SymbolTable {
        match scope {
            Scope::Global => &self.global,
            Scope::Local => &self.local,
        }
    }

    fn level_mut(&mut self, scope: Scope) -> &mut SymbolTable {
        match scope {
            Scope::Global => &mut self.global,
            Scope::Local => &mut self.local,
        }
    }

    pub fn declare(&mut self, name: &str, kind: Kind, ty: Type, scope: Scope) -> &mut Symbol {
        self.level_mut(scope).declare(name, kind, ty)
    }

    pub fn lookup(&self, name: &str, scope: Scope) -> Option<&Symbol> {
        self.level(scope).get(name)
    }

    pub fn lookup_mut(&mut self, name: &str, scope: Scope) -> Option<&mut Symbol> {
        self.level_mut(scope).get_mut(name)
    }

    /// Innermost binding wins.
    pub fn lookup_nearest(&self, name: &str) -> Option<&Symbol> {
        self.local.get(name).or_else(|| self.global.get(name))
    }

    /// Functions only live in the global scope.
    pub fn lookup_function(&self, name: &str) -> Option<&Symbol> {
        self.global.get(name).filter(|s| s.is_function())
    }

    pub fn scope_of(&self, name: &str) -> Option<Scope> {
        if self.local.get(name).is_some() {
            Some(Scope::Local)
        } else if self.global.get(name).is_some() {
            Some(Scope::Global)
        } else {
            None
        }
    }

    pub fn reset(&mut self, scope: Scope) {
        *self.level_mut(scope) = SymbolTable::new();
    }

    pub fn snapshot(&self, scope: Scope) -> SymbolTable {
        self.level(scope).clone()
    }
}
