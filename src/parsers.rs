#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::{
    diagram::{Cardinality, Coverage, Disjointness},
    types::{CardinalityPair, HierarchyPair},
};

peg::parser! {
    /// grammars for the value tokens found in diagram labels and grading
    /// configuration. Callers upper-case the input first.
    pub grammar parser() for str {
        /// matches any number of blanks
        rule _() = quiet!{[' ' | '\t']*}

        /// matches the "many" end of a range, eg. `N` in `0..N`
        rule many() = "N" / "M" / "*"

        /// matches the range operator
        rule dots() = _ ".." _

        /// matches one of the cardinality names
        rule cardinality_name() -> Cardinality
            = "ZERO_OR_ONE" { Cardinality::ZeroOrOne }
            / "ZERO_OR_MANY" { Cardinality::ZeroOrMany }
            / "ONE_OR_MANY" { Cardinality::OneOrMany }
            / "ONE" { Cardinality::One }
            / "NONE" { Cardinality::None }

        /// matches `min..max` notation
        rule cardinality_range() -> Cardinality
            = "0" dots() "1" { Cardinality::ZeroOrOne }
            / "0" dots() many() { Cardinality::ZeroOrMany }
            / "1" dots() "1" { Cardinality::One }
            / "1" dots() many() { Cardinality::OneOrMany }
            / "1" { Cardinality::One }

        /// parses a cardinality written by name or as a range
        pub rule cardinality() -> Cardinality
            = _ c:(cardinality_name() / cardinality_range()) _ { c }

        /// parses a coverage annotation
        pub rule coverage() -> Coverage
            = _ c:("COMPLETE" { Coverage::Complete }
                  / "TOTAL" { Coverage::Complete }
                  / "PARTIAL" { Coverage::Partial }) _
            { c }

        /// parses a disjointness annotation
        pub rule disjointness() -> Disjointness
            = _ d:("EXCLUSIVE" { Disjointness::Exclusive }
                  / "DISJOINT" { Disjointness::Exclusive }
                  / "OVERLAPPING" { Disjointness::Overlapping }
                  / "OVERLAP" { Disjointness::Overlapping }) _
            { d }

        /// parses two cardinalities joined by `-`, in any order
        pub rule cardinality_pair() -> CardinalityPair
            = a:cardinality() "-" b:cardinality() { CardinalityPair::new(a, b) }

        /// parses a coverage and a disjointness joined by `-`, in any order
        pub rule hierarchy_pair() -> HierarchyPair
            = c:coverage() "-" d:disjointness() { HierarchyPair::new(c, d) }
            / d:disjointness() "-" c:coverage() { HierarchyPair::new(c, d) }
    }
}
