//! Per-chat session and the stage-specific data it carries.
//!
//! `DialogueState` is a tagged enum: each variant holds exactly the fields
//! that are valid at that stage, so a later stage can never read a field
//! an earlier stage has not set. Every change goes through
//! [`Session::transition`], which checks the move against [`Stage`]'s
//! state machine.

use serde::{Deserialize, Serialize};

use super::stage::Stage;
use crate::domain::catalog::{Category, Gender, Product, ProductPage};
use crate::domain::foundation::{ChatId, Price, Sku, StateMachine, Timestamp, ValidationError};

/// Delivery pincode: exactly six decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pincode(String);

impl Pincode {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::invalid_format(
                "pincode",
                "expected exactly six digits",
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Pincode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Pincode> for String {
    fn from(value: Pincode) -> Self {
        value.0
    }
}

impl std::fmt::Display for Pincode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shoe size as typed by the shopper: one or two digits, no range check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShoeSize(String);

impl ShoeSize {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if (1..=2).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::invalid_format("size", "expected 1-2 digits"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ShoeSize {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShoeSize> for String {
    fn from(value: ShoeSize) -> Self {
        value.0
    }
}

impl std::fmt::Display for ShoeSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The product the shopper picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProduct {
    pub sku: Sku,
    pub name: String,
    pub price: Price,
}

impl From<&Product> for SelectedProduct {
    fn from(product: &Product) -> Self {
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            price: product.price,
        }
    }
}

/// Search parameters plus the pagination cursor over the result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Browsing {
    pub category: Category,
    pub gender: Gender,
    /// Products on the most recent page, in display order.
    pub last_products: Vec<Product>,
    /// Offset of the page in `last_products`.
    pub product_offset: usize,
    pub has_more_products: bool,
}

impl Browsing {
    pub fn new(category: Category, gender: Gender, offset: usize, page: ProductPage) -> Self {
        Self {
            category,
            gender,
            last_products: page.items,
            product_offset: offset,
            has_more_products: page.has_more,
        }
    }

    /// Offset of the page after the one currently shown.
    pub fn next_offset(&self) -> usize {
        self.product_offset + self.last_products.len()
    }

    /// Looks up a product by its zero-based position on the current page.
    pub fn product_at(&self, index: usize) -> Option<&Product> {
        self.last_products.get(index)
    }
}

/// Everything the order pipeline needs, complete by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub selection: SelectedProduct,
    pub size: ShoeSize,
    /// Raw address message as typed.
    pub address: String,
    pub pincode: Pincode,
}

/// Stage plus the data valid at that stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "stage", rename_all = "camelCase")]
pub enum DialogueState {
    #[default]
    #[serde(rename = "footwearType")]
    AwaitingCategory,

    #[serde(rename = "askGender")]
    AwaitingGender { category: Category },

    #[serde(rename = "showingProducts")]
    BrowsingProducts { browsing: Browsing },

    #[serde(rename = "getSize")]
    AwaitingSize {
        browsing: Browsing,
        selection: SelectedProduct,
    },

    #[serde(rename = "getAddress")]
    AwaitingAddress {
        browsing: Browsing,
        selection: SelectedProduct,
        size: ShoeSize,
    },

    #[serde(rename = "confirmOrder")]
    AwaitingConfirmation { browsing: Browsing, order: OrderDraft },
}

impl DialogueState {
    pub fn stage(&self) -> Stage {
        match self {
            Self::AwaitingCategory => Stage::FootwearType,
            Self::AwaitingGender { .. } => Stage::AskGender,
            Self::BrowsingProducts { .. } => Stage::ShowingProducts,
            Self::AwaitingSize { .. } => Stage::GetSize,
            Self::AwaitingAddress { .. } => Stage::GetAddress,
            Self::AwaitingConfirmation { .. } => Stage::ConfirmOrder,
        }
    }

    /// Category recognised so far, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::AwaitingCategory => None,
            Self::AwaitingGender { category } => Some(*category),
            _ => self.browsing().map(|b| b.category),
        }
    }

    pub fn gender(&self) -> Option<Gender> {
        self.browsing().map(|b| b.gender)
    }

    pub fn browsing(&self) -> Option<&Browsing> {
        match self {
            Self::BrowsingProducts { browsing }
            | Self::AwaitingSize { browsing, .. }
            | Self::AwaitingAddress { browsing, .. }
            | Self::AwaitingConfirmation { browsing, .. } => Some(browsing),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<&SelectedProduct> {
        match self {
            Self::AwaitingSize { selection, .. } | Self::AwaitingAddress { selection, .. } => {
                Some(selection)
            }
            Self::AwaitingConfirmation { order, .. } => Some(&order.selection),
            _ => None,
        }
    }
}

/// One conversation's state, keyed by chat id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub chat_id: ChatId,
    pub state: DialogueState,
    /// Running total of product cards shown; display bookkeeping only.
    pub shown_count: usize,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Session {
    /// A fresh session at the initial stage.
    pub fn new(chat_id: ChatId) -> Self {
        let now = Timestamp::now();
        Self {
            chat_id,
            state: DialogueState::AwaitingCategory,
            shown_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Moves to `next`, rejecting moves the stage machine does not allow.
    ///
    /// On error the session is left untouched.
    pub fn transition(&mut self, next: DialogueState) -> Result<Stage, ValidationError> {
        let target = self.stage().transition_to(next.stage())?;
        self.state = next;
        self.updated_at = Timestamp::now();
        Ok(target)
    }

    /// Category recognised, gender still unknown.
    pub fn await_gender(&mut self, category: Category) -> Result<Stage, ValidationError> {
        self.transition(DialogueState::AwaitingGender { category })
    }

    /// A product page was (re)sent. Replaces the cursor and counts the cards.
    pub fn show_page(
        &mut self,
        category: Category,
        gender: Gender,
        offset: usize,
        page: ProductPage,
    ) -> Result<Stage, ValidationError> {
        let shown = page.items.len();
        let stage = self.transition(DialogueState::BrowsingProducts {
            browsing: Browsing::new(category, gender, offset, page),
        })?;
        self.shown_count += shown;
        Ok(stage)
    }

    /// Picks the product at zero-based `index` of the current page.
    pub fn select(&mut self, index: usize) -> Result<Stage, ValidationError> {
        let browsing = match &self.state {
            DialogueState::BrowsingProducts { browsing } => browsing.clone(),
            other => {
                return Err(ValidationError::invalid_format(
                    "state_transition",
                    format!("Cannot select a product in {}", other.stage()),
                ))
            }
        };
        let product = browsing.product_at(index).ok_or_else(|| {
            ValidationError::out_of_range(
                "selection",
                1,
                browsing.last_products.len() as i64,
                index as i64 + 1,
            )
        })?;
        let selection = SelectedProduct::from(product);
        self.transition(DialogueState::AwaitingSize { browsing, selection })
    }

    pub fn capture_size(&mut self, size: ShoeSize) -> Result<Stage, ValidationError> {
        match self.state.clone() {
            DialogueState::AwaitingSize { browsing, selection } => {
                self.transition(DialogueState::AwaitingAddress {
                    browsing,
                    selection,
                    size,
                })
            }
            other => Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot capture a size in {}", other.stage()),
            )),
        }
    }

    pub fn capture_address(
        &mut self,
        address: String,
        pincode: Pincode,
    ) -> Result<Stage, ValidationError> {
        match self.state.clone() {
            DialogueState::AwaitingAddress {
                browsing,
                selection,
                size,
            } => self.transition(DialogueState::AwaitingConfirmation {
                browsing,
                order: OrderDraft {
                    selection,
                    size,
                    address,
                    pincode,
                },
            }),
            other => Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot capture an address in {}", other.stage()),
            )),
        }
    }

    /// The complete order awaiting confirmation, if the chat is there.
    pub fn order_draft(&self) -> Option<&OrderDraft> {
        match &self.state {
            DialogueState::AwaitingConfirmation { order, .. } => Some(order),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    mod value_objects {
        use super::*;

        #[test]
        fn pincode_accepts_exactly_six_digits() {
            assert!(Pincode::parse("560001").is_ok());
            assert!(Pincode::parse("56001").is_err());
            assert!(Pincode::parse("5600011").is_err());
            assert!(Pincode::parse("56a001").is_err());
        }

        #[test]
        fn pincode_deserialization_is_validated() {
            assert!(serde_json::from_str::<Pincode>("\"560001\"").is_ok());
            assert!(serde_json::from_str::<Pincode>("\"12\"").is_err());
        }

        #[test]
        fn shoe_size_accepts_one_or_two_digits() {
            assert!(ShoeSize::parse("9").is_ok());
            assert!(ShoeSize::parse("11").is_ok());
            assert!(ShoeSize::parse("110").is_err());
            assert!(ShoeSize::parse("").is_err());
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn new_session_starts_at_footwear_type() {
            let session = Session::new(ChatId::new("c").unwrap());
            assert_eq!(session.stage(), Stage::FootwearType);
            assert_eq!(session.shown_count, 0);
        }

        #[test]
        fn show_page_counts_cards() {
            let mut session = browsing_session();
            assert_eq!(session.shown_count, 3);
            session
                .show_page(Category::Sports, Gender::Men, 3, page_of_three())
                .unwrap();
            assert_eq!(session.shown_count, 6);
            assert_eq!(session.state.browsing().unwrap().product_offset, 3);
        }

        #[test]
        fn select_uses_zero_based_index_of_current_page() {
            let mut session = browsing_session();
            session.select(1).unwrap();
            assert_eq!(session.stage(), Stage::GetSize);
            assert_eq!(session.state.selection().unwrap().sku.as_str(), "RUN-002");
        }

        #[test]
        fn select_out_of_range_leaves_session_unchanged() {
            let mut session = browsing_session();
            let before = session.clone();
            assert!(session.select(4).is_err());
            assert_eq!(session, before);
        }

        #[test]
        fn full_path_builds_order_draft() {
            let mut session = browsing_session();
            session.select(0).unwrap();
            session.capture_size(ShoeSize::parse("9").unwrap()).unwrap();
            session
                .capture_address(
                    "my house, pincode 560001".to_string(),
                    Pincode::parse("560001").unwrap(),
                )
                .unwrap();

            let draft = session.order_draft().unwrap();
            assert_eq!(draft.selection.sku.as_str(), "RUN-001");
            assert_eq!(draft.size.as_str(), "9");
            assert_eq!(draft.pincode.as_str(), "560001");
            assert_eq!(session.state.category(), Some(Category::Sports));
        }

        #[test]
        fn size_cannot_be_captured_before_selection() {
            let mut session = browsing_session();
            assert!(session.capture_size(ShoeSize::parse("9").unwrap()).is_err());
            assert_eq!(session.stage(), Stage::ShowingProducts);
        }

        #[test]
        fn transition_rejects_skipping_stages() {
            let mut session = Session::new(ChatId::new("c").unwrap());
            let result = session.transition(DialogueState::AwaitingSize {
                browsing: Browsing::new(Category::Sports, Gender::Men, 0, page_of_three()),
                selection: SelectedProduct::from(&product("X", "X")),
            });
            assert!(result.is_err());
            assert_eq!(session.stage(), Stage::FootwearType);
        }
    }

    #[test]
    fn dialogue_state_serializes_with_stage_tag() {
        let state = DialogueState::AwaitingGender {
            category: Category::Boots,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["stage"], "askGender");
        assert_eq!(json["category"], "boots");
    }
}
