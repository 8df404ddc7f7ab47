use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    Hydrogen,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Phosphorus,
    Sulfur,
    Chlorine,
    Bromine,
    Iodine,
    Other, // Anything outside the organic subset above
}

static ELEMENT_SYMBOLS: Map<&'static str, Element> = phf_map! {
    "H" => Element::Hydrogen,
    "C" => Element::Carbon,
    "N" => Element::Nitrogen,
    "O" => Element::Oxygen,
    "F" => Element::Fluorine,
    "P" => Element::Phosphorus,
    "S" => Element::Sulfur,
    "CL" => Element::Chlorine,
    "BR" => Element::Bromine,
    "I" => Element::Iodine,
};

impl Element {
    /// Number of distinct element classes, i.e. the width of the one-hot encoding.
    pub const COUNT: usize = 11;

    pub const ALL: [Element; Self::COUNT] = [
        Element::Hydrogen,
        Element::Carbon,
        Element::Nitrogen,
        Element::Oxygen,
        Element::Fluorine,
        Element::Phosphorus,
        Element::Sulfur,
        Element::Chlorine,
        Element::Bromine,
        Element::Iodine,
        Element::Other,
    ];

    /// Position of this element in the one-hot feature encoding.
    pub fn one_hot_index(self) -> usize {
        self as usize
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::Hydrogen => "H",
            Element::Carbon => "C",
            Element::Nitrogen => "N",
            Element::Oxygen => "O",
            Element::Fluorine => "F",
            Element::Phosphorus => "P",
            Element::Sulfur => "S",
            Element::Chlorine => "Cl",
            Element::Bromine => "Br",
            Element::Iodine => "I",
            Element::Other => "X",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid element symbol: '{0}'")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    /// Parses an element symbol case-insensitively. Well-formed symbols that are
    /// not part of the organic subset map to [`Element::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        if symbol.is_empty()
            || symbol.len() > 3
            || !symbol.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(ParseElementError(s.to_string()));
        }
        Ok(ELEMENT_SYMBOLS
            .get(symbol.to_ascii_uppercase().as_str())
            .copied()
            .unwrap_or(Element::Other))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub element: Element,
    pub name: Option<String>, // Optional label carried through from the input file
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            name: None,
        }
    }

    pub fn with_name(element: Element, name: &str) -> Self {
        Self {
            element,
            name: Some(name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_from_str_parses_known_symbols_case_insensitively() {
        assert_eq!("C".parse::<Element>().unwrap(), Element::Carbon);
        assert_eq!("c".parse::<Element>().unwrap(), Element::Carbon);
        assert_eq!("Cl".parse::<Element>().unwrap(), Element::Chlorine);
        assert_eq!("CL".parse::<Element>().unwrap(), Element::Chlorine);
        assert_eq!("br".parse::<Element>().unwrap(), Element::Bromine);
        assert_eq!(" H ".parse::<Element>().unwrap(), Element::Hydrogen);
    }

    #[test]
    fn element_from_str_maps_unlisted_symbols_to_other() {
        assert_eq!("Fe".parse::<Element>().unwrap(), Element::Other);
        assert_eq!("Na".parse::<Element>().unwrap(), Element::Other);
    }

    #[test]
    fn element_from_str_rejects_malformed_symbols() {
        assert!("".parse::<Element>().is_err());
        assert!("C1".parse::<Element>().is_err());
        assert!("Carbon".parse::<Element>().is_err());
    }

    #[test]
    fn one_hot_indices_are_distinct_and_dense() {
        let mut seen = [false; Element::COUNT];
        for element in Element::ALL {
            let idx = element.one_hot_index();
            assert!(idx < Element::COUNT);
            assert!(!seen[idx]);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for element in Element::ALL.iter().filter(|e| **e != Element::Other) {
            assert_eq!(element.to_string().parse::<Element>().unwrap(), *element);
        }
    }

    #[test]
    fn atom_with_name_keeps_label() {
        let atom = Atom::with_name(Element::Oxygen, "O1");
        assert_eq!(atom.element, Element::Oxygen);
        assert_eq!(atom.name.as_deref(), Some("O1"));
        assert!(Atom::new(Element::Carbon).name.is_none());
    }
}
