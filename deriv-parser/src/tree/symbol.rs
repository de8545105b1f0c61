#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The id of a variable in a [`SymbolTable`].
///
/// Ids are dense and assigned in order of first appearance, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    /// The position of the symbol in its table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single variable: its name and, once bound, its value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Symbol {
    /// The name of the variable, as written in the source.
    pub name: String,

    /// The value the variable currently evaluates to, or [`None`] if it is unbound.
    pub value: Option<f64>,
}

/// An insertion-ordered table mapping variable names to stable ids and numeric bindings.
///
/// Variable nodes store a [`SymbolId`] instead of the variable's name. The table is small in
/// practice, so lookups are a linear scan.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the given name, adding an unbound entry for it if it is not present.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        self.lookup(name).unwrap_or_else(|| {
            self.symbols.push(Symbol { name: name.to_string(), value: None });
            SymbolId(self.symbols.len() - 1)
        })
    }

    /// Returns the id of the given name, if present.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.symbols.iter()
            .position(|symbol| symbol.name == name)
            .map(SymbolId)
    }

    /// Returns the symbol with the given id.
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    /// Returns the name of the symbol with the given id.
    pub fn name(&self, id: SymbolId) -> Option<&str> {
        self.get(id).map(|symbol| symbol.name.as_str())
    }

    /// Returns the value bound to the symbol with the given id. Returns [`None`] if the id is
    /// unknown or the symbol is unbound.
    pub fn value(&self, id: SymbolId) -> Option<f64> {
        self.get(id)?.value
    }

    /// Binds a value to the named variable, adding it to the table if needed. Returns its id.
    pub fn bind(&mut self, name: &str, value: f64) -> SymbolId {
        let id = self.intern(name);
        self.symbols[id.0].value = Some(value);
        id
    }

    /// Binds a value to an existing symbol. Returns false if the id is unknown.
    pub fn bind_id(&mut self, id: SymbolId, value: f64) -> bool {
        match self.symbols.get_mut(id.0) {
            Some(symbol) => {
                symbol.value = Some(value);
                true
            },
            None => false,
        }
    }

    /// Removes the value bound to the symbol with the given id, returning it.
    pub fn unbind(&mut self, id: SymbolId) -> Option<f64> {
        self.symbols.get_mut(id.0)?.value.take()
    }

    /// Returns true if every symbol in the table has a value.
    pub fn all_bound(&self) -> bool {
        self.symbols.iter().all(|symbol| symbol.value.is_some())
    }

    /// Iterates over the symbols in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, symbol)| (SymbolId(i), symbol))
    }

    /// The number of symbols in the table.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the table has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
