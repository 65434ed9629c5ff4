//! Closed code sets: site, special (department) and work order type.
//!
//! Each parses case-insensitively and never fails: unknown text yields the
//! caller-supplied default, normally the one from [`crate::Config`].

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical code as written to the sheet.
            pub const fn code(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            /// Case-insensitive exact match on the code.
            pub fn from_code(text: &str) -> Option<Self> {
                let text = text.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|member| member.code().eq_ignore_ascii_case(text))
            }

            /// Parse `text`, returning `default` when it names no member.
            pub fn parse(text: &str, default: Self) -> Self {
                Self::from_code(text).unwrap_or(default)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

code_enum! {
    /// Installation a work order is raised against.
    Site {
        /// Fort Greely
        FG,
        /// Vandenberg
        VB,
        /// Colorado Springs
        CS,
        /// Eareckson
        EA,
        /// Fort Drum
        FD,
        /// Sea-Based X-Band
        SX,
        /// Fylingdales
        FY,
        /// Clear
        CL,
        /// Beale
        BL,
        /// Thule
        TH,
    }
}

code_enum! {
    /// Group ("special") responsible for the work.
    Special {
        /// Northrop Grumman
        N,
        /// System administration
        S,
        /// Information system security
        I,
    }
}

code_enum! {
    /// Kind of maintenance.
    WorkOrderType {
        /// Preventative maintenance
        PM,
        /// Corrective maintenance
        CM,
        /// Other
        OTH,
    }
}
