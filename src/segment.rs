//! Maps VM memory segments onto Hack addressing.

use crate::ast::Segment;

/// Where a segment slot lives in the target machine.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Address {
    /// `*base + index`, resolved at runtime through a base register
    BaseRelative(&'static str, u16),
    /// A register or assembler symbol addressed directly
    Fixed(String),
    /// Not memory backed; the value itself
    Literal(u16),
}

/// Resolve `segment index` for code in translation unit `unit`.
///
/// Indices are expected to be in range already; the parser rejects
/// `temp` above 7 and `pointer` above 1.
pub fn resolve(unit: &str, segment: Segment, index: u16) -> Address {
    match segment {
        Segment::Local => Address::BaseRelative("LCL", index),
        Segment::Argument => Address::BaseRelative("ARG", index),
        Segment::This => Address::BaseRelative("THIS", index),
        Segment::That => Address::BaseRelative("THAT", index),
        Segment::Temp => Address::Fixed(format!("R{}", 5 + index)),
        Segment::Pointer => Address::Fixed(if index == 0 { "THIS" } else { "THAT" }.to_string()),
        Segment::Static => Address::Fixed(format!("{}.{}", unit, index)),
        Segment::Constant => Address::Literal(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_relative_segments() {
        assert_eq!(resolve("Main", Segment::Local, 2), Address::BaseRelative("LCL", 2));
        assert_eq!(resolve("Main", Segment::Argument, 0), Address::BaseRelative("ARG", 0));
        assert_eq!(resolve("Main", Segment::This, 5), Address::BaseRelative("THIS", 5));
        assert_eq!(resolve("Main", Segment::That, 1), Address::BaseRelative("THAT", 1));
    }

    #[test]
    fn fixed_segments() {
        assert_eq!(resolve("Main", Segment::Temp, 0), Address::Fixed("R5".to_string()));
        assert_eq!(resolve("Main", Segment::Temp, 7), Address::Fixed("R12".to_string()));
        assert_eq!(resolve("Main", Segment::Pointer, 0), Address::Fixed("THIS".to_string()));
        assert_eq!(resolve("Main", Segment::Pointer, 1), Address::Fixed("THAT".to_string()));
    }

    #[test]
    fn static_is_scoped_by_unit() {
        assert_eq!(resolve("Main", Segment::Static, 3), Address::Fixed("Main.3".to_string()));
        assert_eq!(resolve("Sys", Segment::Static, 3), Address::Fixed("Sys.3".to_string()));
    }

    #[test]
    fn constant_is_literal() {
        assert_eq!(resolve("Main", Segment::Constant, 17), Address::Literal(17));
    }
}
