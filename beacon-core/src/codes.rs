//! Wire codes for closed attribute domains.
//!
//! The transport expects small positive integers where the public API speaks
//! in names. Each domain is a Rust enum whose variants carry their fixed code
//! and their camelCase wire name. Parsing an unknown name fails with
//! [`InvalidEnumValue`]; nothing is ever coerced to a default.

use crate::error::InvalidEnumValue;

macro_rules! wire_codes {
    (
        $(#[$meta:meta])*
        $name:ident ($domain:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every value of the domain, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human-readable domain name used in errors.
            pub const DOMAIN: &'static str = $domain;

            /// The numeric code sent over the wire.
            pub const fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// The camelCase name used by the public API.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(InvalidEnumValue {
                        domain: $domain,
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_codes! {
    /// Whether a resource is gained or spent.
    ResourceFlow ("resource flow") {
        /// Resource gained.
        Source = 1 => "source",
        /// Resource spent.
        Sink = 2 => "sink",
    }
}

wire_codes! {
    /// Status of a multi-step flow.
    ProgressionStatus ("progression status") {
        /// Flow started.
        Start = 1 => "start",
        /// Flow completed.
        Complete = 2 => "complete",
        /// Flow failed.
        Fail = 3 => "fail",
    }
}

wire_codes! {
    /// Severity of an error event.
    ErrorSeverity ("error severity") {
        /// Debug.
        Debug = 1 => "debug",
        /// Info.
        Info = 2 => "info",
        /// Warning.
        Warning = 3 => "warning",
        /// Error.
        Error = 4 => "error",
        /// Critical.
        Critical = 5 => "critical",
    }
}

wire_codes! {
    /// Ad interaction.
    AdAction ("ad action") {
        /// The ad was clicked.
        Clicked = 1 => "clicked",
        /// The ad was shown.
        Show = 2 => "show",
        /// The ad failed to show.
        FailedShow = 3 => "failedShow",
        /// A reward was granted.
        RewardReceived = 4 => "rewardReceived",
    }
}

wire_codes! {
    /// Ad format.
    AdType ("ad type") {
        /// Video.
        Video = 1 => "video",
        /// Rewarded video.
        RewardedVideo = 2 => "rewardedVideo",
        /// Playable.
        Playable = 3 => "playable",
        /// Interstitial.
        Interstitial = 4 => "interstitial",
        /// Offer wall.
        OfferWall = 5 => "offerWall",
        /// Banner.
        Banner = 6 => "banner",
    }
}

wire_codes! {
    /// Reason an ad could not be shown.
    AdError ("ad failure reason") {
        /// Unknown.
        Unknown = 1 => "unknown",
        /// Device offline.
        Offline = 2 => "offline",
        /// No inventory.
        NoFill = 3 => "noFill",
        /// Ad network error.
        InternalError = 4 => "internalError",
        /// Malformed request.
        InvalidRequest = 5 => "invalidRequest",
        /// Could not precache.
        UnableToPrecache = 6 => "unableToPrecache",
    }
}

/// Map a resource flow name to its wire code.
pub fn map_resource_flow(value: &str) -> Result<u8, InvalidEnumValue> {
    value.parse::<ResourceFlow>().map(ResourceFlow::code)
}

/// Map a progression status name to its wire code.
pub fn map_progression_status(value: &str) -> Result<u8, InvalidEnumValue> {
    value.parse::<ProgressionStatus>().map(ProgressionStatus::code)
}

/// Map an error severity name to its wire code.
pub fn map_error_severity(value: &str) -> Result<u8, InvalidEnumValue> {
    value.parse::<ErrorSeverity>().map(ErrorSeverity::code)
}

/// Map an ad action name to its wire code.
pub fn map_ad_action(value: &str) -> Result<u8, InvalidEnumValue> {
    value.parse::<AdAction>().map(AdAction::code)
}

/// Map an ad type name to its wire code.
pub fn map_ad_type(value: &str) -> Result<u8, InvalidEnumValue> {
    value.parse::<AdType>().map(AdType::code)
}

/// Map an ad failure reason name to its wire code.
pub fn map_ad_error(value: &str) -> Result<u8, InvalidEnumValue> {
    value.parse::<AdError>().map(AdError::code)
}
