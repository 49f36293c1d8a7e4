use crate::{
    constant::{DEFINE, OR},
    data::{AssemblyError, AssemblyErrorCode, FlagTable},
    parser::parse_hex,
};

/// A `name = expression` line reduced to its constant word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub value: u64,
}

impl Definition {
    /// `combine_literals` selects between the legacy rule, where the first
    /// token containing a digit is the whole value, and a full OR over
    /// every token.
    pub fn parse(
        line: &str,
        flags: &FlagTable,
        combine_literals: bool,
    ) -> Result<Self, AssemblyError> {
        let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        let (name, expression) = match compact.split_once(DEFINE) {
            Some(parts) => parts,
            None => {
                return Err(AssemblyError::new(
                    AssemblyErrorCode::InvalidDefinition,
                    format!("[ {line} ] is not a definition"),
                ))
            }
        };
        if name.is_empty() {
            return Err(AssemblyError::new(
                AssemblyErrorCode::InvalidDefinition,
                format!("definition [ {line} ] has no name"),
            ));
        }

        let mut value: u64 = 0;
        for token in expression.split(OR) {
            if is_numeric(token) {
                let literal = parse_hex(token)?;
                if !combine_literals {
                    return Ok(Self {
                        name: name.to_string(),
                        value: literal,
                    });
                }
                value |= literal;
            } else {
                value |= u64::from(flags.get_mask(token)?);
            }
        }
        Ok(Self {
            name: name.to_string(),
            value,
        })
    }
}

fn is_numeric(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> FlagTable {
        FlagTable::from_entries(&[("FLAGX", 0x01), ("FLAGY", 0x10)])
    }

    #[test]
    fn or_of_flags() {
        let def = Definition::parse("FLAGSA = FLAGX | FLAGY", &flags(), false).unwrap();
        assert_eq!(def.name, "FLAGSA");
        assert_eq!(def.value, 0x11);
    }

    #[test]
    fn hex_literal() {
        let def = Definition::parse("DELAY=  1f4", &flags(), false).unwrap();
        assert_eq!(def.value, 0x1f4);
        let def = Definition::parse("BIG = 0xFFFFFFFFFF", &flags(), false).unwrap();
        assert_eq!(def.value, 0xff_ffff_ffff);
    }

    #[test]
    fn legacy_rule_keeps_only_first_numeric_token() {
        let def = Definition::parse("A = FLAGY | 2 | FLAGX | 40", &flags(), false).unwrap();
        assert_eq!(def.value, 0x2);
    }

    #[test]
    fn legacy_rule_still_validates_leading_flags() {
        let err = Definition::parse("A = NOPE | 2", &flags(), false).unwrap_err();
        assert_eq!(err.code, AssemblyErrorCode::UnknownFlag);
        // tokens after the literal are never looked at
        assert!(Definition::parse("A = 2 | NOPE", &flags(), false).is_ok());
    }

    #[test]
    fn combined_rule_ors_everything() {
        let def = Definition::parse("A = FLAGY | 2 | FLAGX | 40", &flags(), true).unwrap();
        assert_eq!(def.value, 0x53);
        let err = Definition::parse("A = 2 | NOPE", &flags(), true).unwrap_err();
        assert_eq!(err.code, AssemblyErrorCode::UnknownFlag);
    }

    #[test]
    fn bad_definitions() {
        let err = Definition::parse("= FLAGX", &flags(), false).unwrap_err();
        assert_eq!(err.code, AssemblyErrorCode::InvalidDefinition);
        let err = Definition::parse("A =", &flags(), false).unwrap_err();
        assert_eq!(err.code, AssemblyErrorCode::UnknownFlag);
        let err = Definition::parse("A = 12g", &flags(), false).unwrap_err();
        assert_eq!(err.code, AssemblyErrorCode::InvalidOperand);
    }
}
