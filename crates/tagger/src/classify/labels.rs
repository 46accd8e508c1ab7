// ABOUTME: Label enums produced by the classifier battery.
// ABOUTME: Each enum serializes as its PascalCase variant name, the service's wire format.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! label_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every label, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum!(
    /// Sentence mood as signalled by punctuation and the root verb.
    FunctionalType {
        Declarative,
        Interrogative,
        Exclamatory,
        Imperative,
    }
);

label_enum!(
    /// Clause structure.
    Structure {
        Simple,
        Compound,
        Complex,
        CompoundComplex,
        Fragment,
    }
);

label_enum!(
    /// Grammatical voice.
    Voice { Active, Passive }
);

label_enum!(
    /// What kind of information the sentence carries.
    InformativeType {
        Fact,
        Statistic,
        Definition,
        Claim,
        Observation,
        Opinion,
        Prediction,
        Suggestion,
        Question,
        Transition,
        Filler,
        Uncertain,
    }
);

label_enum!(
    /// How widely known or how sourced the information is.
    InfoQuality {
        WellKnown,
        PartiallyKnown,
        Derived,
        Unique,
        False,
    }
);

label_enum!(
    /// How easily the sentence can be lifted into an answer.
    ClarityType {
        Focused,
        ModerateComplexity,
        LowClarity,
        UnIndexable,
    }
);

label_enum!(
    /// Where a claim originates.
    SourceType {
        FirstParty,
        SecondParty,
        ThirdParty,
        Unknown,
    }
);
