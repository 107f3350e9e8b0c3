use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

macro_rules! us_states {
    ($($code:ident => $name:literal),+ $(,)?) => {
        /// US state or district of a contact's address, serialized as its postal code
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum UsState {
            $($code),+
        }

        impl UsState {
            pub const ALL: &'static [UsState] = &[$(UsState::$code),+];

            pub fn code(&self) -> &'static str {
                match self {
                    $(UsState::$code => stringify!($code)),+
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(UsState::$code => $name),+
                }
            }
        }

        impl FromStr for UsState {
            type Err = UnknownStateCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $(stringify!($code) => Ok(UsState::$code),)+
                    _ => Err(UnknownStateCode(s.to_string())),
                }
            }
        }
    };
}

us_states! {
    AL => "Alabama",
    AK => "Alaska",
    AZ => "Arizona",
    AR => "Arkansas",
    CA => "California",
    CO => "Colorado",
    CT => "Connecticut",
    DE => "Delaware",
    DC => "District of Columbia",
    FL => "Florida",
    GA => "Georgia",
    HI => "Hawaii",
    ID => "Idaho",
    IL => "Illinois",
    IN => "Indiana",
    IA => "Iowa",
    KS => "Kansas",
    KY => "Kentucky",
    LA => "Louisiana",
    ME => "Maine",
    MD => "Maryland",
    MA => "Massachusetts",
    MI => "Michigan",
    MN => "Minnesota",
    MS => "Mississippi",
    MO => "Missouri",
    MT => "Montana",
    NE => "Nebraska",
    NV => "Nevada",
    NH => "New Hampshire",
    NJ => "New Jersey",
    NM => "New Mexico",
    NY => "New York",
    NC => "North Carolina",
    ND => "North Dakota",
    OH => "Ohio",
    OK => "Oklahoma",
    OR => "Oregon",
    PA => "Pennsylvania",
    RI => "Rhode Island",
    SC => "South Carolina",
    SD => "South Dakota",
    TN => "Tennessee",
    TX => "Texas",
    UT => "Utah",
    VT => "Vermont",
    VA => "Virginia",
    WA => "Washington",
    WV => "West Virginia",
    WI => "Wisconsin",
    WY => "Wyoming",
}

impl fmt::Display for UsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown state code: {0}")]
pub struct UnknownStateCode(pub String);
