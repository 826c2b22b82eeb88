//! FILENAME: engine/src/functions/mod.rs
//! PURPOSE: The built-in function library (§4.8) and its registration entry point.
//! CONTEXT: One submodule per functional family, mirroring how the teacher
//! groups related pieces into small focused files rather than one flat list.

pub mod aggregate;
pub mod comparison;
pub mod conditional;
pub mod helpers;
pub mod logical;
pub mod lookup;
pub mod text;

use crate::registry::FunctionRegistry;

/// Registers every built-in named in the function library under its
/// canonical upper-case name.
pub fn register_builtins(registry: &mut FunctionRegistry) {
    registry.register("SUM", aggregate::sum);
    registry.register("AVERAGE", aggregate::average);
    registry.register("MIN", aggregate::min);
    registry.register("MAX", aggregate::max);
    registry.register("COUNT", aggregate::count);
    registry.register("COUNTA", aggregate::counta);

    registry.register("IF", logical::if_fn);
    registry.register("AND", logical::and);
    registry.register("OR", logical::or);
    registry.register("NOT", logical::not);

    registry.register("EQ", comparison::eq);
    registry.register("NE", comparison::ne);
    registry.register("GT", comparison::gt);
    registry.register("GTE", comparison::gte);
    registry.register("LT", comparison::lt);
    registry.register("LTE", comparison::lte);

    registry.register("CONCAT", text::concat);
    registry.register("LEN", text::len);
    registry.register("UPPER", text::upper);
    registry.register("LOWER", text::lower);

    registry.register("COUNTIF", conditional::countif);
    registry.register("SUMIF", conditional::sumif);

    registry.register("MATCH", lookup::match_fn);
    registry.register("INDEX", lookup::index);
    registry.register("VLOOKUP", lookup::vlookup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_all_named_builtins() {
        let mut registry = FunctionRegistry::new();
        register_builtins(&mut registry);
        let expected = [
            "SUM", "AVERAGE", "MIN", "MAX", "COUNT", "COUNTA", "IF", "AND", "OR", "NOT", "EQ",
            "NE", "GT", "GTE", "LT", "LTE", "CONCAT", "LEN", "UPPER", "LOWER", "COUNTIF", "SUMIF",
            "MATCH", "INDEX", "VLOOKUP",
        ];
        for name in expected {
            assert!(registry.has(name), "missing built-in {name}");
        }
    }
}
