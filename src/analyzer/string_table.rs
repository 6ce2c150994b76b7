/// Literal strings referenced by `printf`. Every call to
/// [`StringTable::intern`] gets a fresh index, even for repeated text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StringTable {
    strings: Vec<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> usize {
        self.strings.push(text.to_string());
        self.strings.len() - 1
    }

    pub fn resolve(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.strings.iter().map(String::as_str).enumerate()
    }
}
