//! Dialogue stages and their allowed transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Position of a chat in the ordered dialogue flow.
///
/// The machine has no terminal stage: completing or cancelling an order
/// loops back to `FootwearType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// Waiting for the shopper to name a footwear category.
    #[default]
    FootwearType,
    /// Category known, waiting for who the shoes are for.
    AskGender,
    /// A product page was sent; waiting for a pick or "more".
    ShowingProducts,
    /// Product picked, waiting for a size.
    GetSize,
    /// Size known, waiting for a delivery address with pincode.
    GetAddress,
    /// Summary shown, waiting for yes/no.
    ConfirmOrder,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::FootwearType,
        Stage::AskGender,
        Stage::ShowingProducts,
        Stage::GetSize,
        Stage::GetAddress,
        Stage::ConfirmOrder,
    ];

    /// Wire name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FootwearType => "footwearType",
            Self::AskGender => "askGender",
            Self::ShowingProducts => "showingProducts",
            Self::GetSize => "getSize",
            Self::GetAddress => "getAddress",
            Self::ConfirmOrder => "confirmOrder",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    // Every stage may stay put (re-prompt) or fall back to FootwearType
    // (restart, cancellation, collaborator failure).
    fn valid_transitions(&self) -> Vec<Self> {
        use Stage::*;
        match self {
            FootwearType => vec![FootwearType, AskGender, ShowingProducts],
            AskGender => vec![AskGender, ShowingProducts, FootwearType],
            ShowingProducts => vec![ShowingProducts, GetSize, FootwearType],
            GetSize => vec![GetSize, GetAddress, FootwearType],
            GetAddress => vec![GetAddress, ConfirmOrder, FootwearType],
            ConfirmOrder => vec![ConfirmOrder, FootwearType],
        }
    }
}
