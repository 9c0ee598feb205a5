//! Stage table for the conversation.
//!
//! `interpret` reads one inbound message against the current dialogue
//! state and says what should happen next. It performs no I/O and never
//! mutates the session; the message handler executes the returned
//! [`Decision`] against the collaborators and the session store.

use super::extractor::{
    extract_category, extract_confirmation, extract_gender, extract_pincode, extract_size,
    is_more_request, is_restart_command, names_shown_product, resolve_selection, Confirmation,
};
use super::session::{DialogueState, Pincode, ShoeSize};
use crate::domain::catalog::{Category, Gender};

/// Why the current stage's required input was not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepromptReason {
    UnknownCategory,
    UnknownGender,
    UnresolvedSelection,
    MissingSize,
    MissingPincode,
    UnclearConfirmation,
}

/// Outcome of interpreting one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Explicit restart command, valid in every stage.
    Restart,
    /// Stay in the current stage and ask again.
    Reprompt(RepromptReason),
    /// Category recognised without a gender.
    AskGender { category: Category },
    /// Search the first page for this category and gender.
    Search { category: Category, gender: Gender },
    /// Search the page after the one currently shown.
    NextPage {
        category: Category,
        gender: Gender,
        offset: usize,
    },
    /// "More" was asked for but the last page was the final one.
    NoMorePages,
    /// Pick the product at this zero-based position of the current page.
    Select { index: usize },
    CaptureSize(ShoeSize),
    CaptureAddress { address: String, pincode: Pincode },
    /// Run the order pipeline.
    PlaceOrder,
    /// Shopper declined the order summary.
    Cancel,
}

impl Decision {
    pub fn is_reprompt(&self) -> bool {
        matches!(self, Self::Reprompt(_))
    }
}

/// Maps (current state, message) to the next action.
pub fn interpret(state: &DialogueState, text: &str) -> Decision {
    if is_restart_command(text) {
        return Decision::Restart;
    }

    match state {
        DialogueState::AwaitingCategory => match extract_category(text) {
            Some(category) => match extract_gender(text) {
                Some(gender) => Decision::Search { category, gender },
                None => Decision::AskGender { category },
            },
            None => Decision::Reprompt(RepromptReason::UnknownCategory),
        },

        DialogueState::AwaitingGender { category } => match extract_gender(text) {
            Some(gender) => Decision::Search {
                category: *category,
                gender,
            },
            None => Decision::Reprompt(RepromptReason::UnknownGender),
        },

        DialogueState::BrowsingProducts { browsing } => {
            // A full product name outranks any paging word inside it.
            if let Some(index) = names_shown_product(text, &browsing.last_products) {
                Decision::Select { index }
            } else if is_more_request(text) {
                if browsing.has_more_products {
                    Decision::NextPage {
                        category: browsing.category,
                        gender: browsing.gender,
                        offset: browsing.next_offset(),
                    }
                } else {
                    Decision::NoMorePages
                }
            } else {
                match resolve_selection(text, &browsing.last_products) {
                    Some(index) => Decision::Select { index },
                    None => Decision::Reprompt(RepromptReason::UnresolvedSelection),
                }
            }
        }

        DialogueState::AwaitingSize { .. } => match extract_size(text) {
            Some(size) => Decision::CaptureSize(size),
            None => Decision::Reprompt(RepromptReason::MissingSize),
        },

        DialogueState::AwaitingAddress { .. } => match extract_pincode(text) {
            Some(pincode) => Decision::CaptureAddress {
                address: text.to_string(),
                pincode,
            },
            None => Decision::Reprompt(RepromptReason::MissingPincode),
        },

        DialogueState::AwaitingConfirmation { .. } => match extract_confirmation(text) {
            Confirmation::Affirmative => Decision::PlaceOrder,
            Confirmation::Negative => Decision::Cancel,
            Confirmation::Unrecognized => {
                Decision::Reprompt(RepromptReason::UnclearConfirmation)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::session::fixtures::{browsing_session, page_of_three, product};
    use crate::domain::conversation::session::{Browsing, SelectedProduct};
    use proptest::prelude::*;

    fn browsing(has_more: bool) -> Browsing {
        let mut page = page_of_three();
        page.has_more = has_more;
        Browsing::new(Category::Sports, Gender::Men, 3, page)
    }

    fn awaiting_size() -> DialogueState {
        let b = browsing(true);
        let selection = SelectedProduct::from(&b.last_products[1]);
        DialogueState::AwaitingSize {
            browsing: b,
            selection,
        }
    }

    fn awaiting_address() -> DialogueState {
        let b = browsing(true);
        let selection = SelectedProduct::from(&b.last_products[1]);
        DialogueState::AwaitingAddress {
            browsing: b,
            selection,
            size: ShoeSize::parse("9").unwrap(),
        }
    }

    fn awaiting_confirmation() -> DialogueState {
        let mut session = browsing_session();
        session.select(1).unwrap();
        session.capture_size(ShoeSize::parse("9").unwrap()).unwrap();
        session
            .capture_address("home 560001".into(), Pincode::parse("560001").unwrap())
            .unwrap();
        session.state
    }

    fn all_states() -> Vec<DialogueState> {
        vec![
            DialogueState::AwaitingCategory,
            DialogueState::AwaitingGender {
                category: Category::Boots,
            },
            DialogueState::BrowsingProducts {
                browsing: browsing(true),
            },
            awaiting_size(),
            awaiting_address(),
            awaiting_confirmation(),
        ]
    }

    mod footwear_type {
        use super::*;

        #[test]
        fn category_and_gender_in_one_message_skips_ask_gender() {
            let decision = interpret(&DialogueState::AwaitingCategory, "I want sports shoes for a boy");
            assert_eq!(
                decision,
                Decision::Search {
                    category: Category::Sports,
                    gender: Gender::Men
                }
            );
        }

        #[test]
        fn category_alone_asks_for_gender() {
            let decision = interpret(&DialogueState::AwaitingCategory, "show me some boots");
            assert_eq!(
                decision,
                Decision::AskGender {
                    category: Category::Boots
                }
            );
        }

        #[test]
        fn unknown_category_reprompts() {
            let decision = interpret(&DialogueState::AwaitingCategory, "hi");
            assert_eq!(decision, Decision::Reprompt(RepromptReason::UnknownCategory));
        }
    }

    mod ask_gender {
        use super::*;

        #[test]
        fn gender_triggers_search_with_known_category() {
            let state = DialogueState::AwaitingGender {
                category: Category::Formal,
            };
            assert_eq!(
                interpret(&state, "for my wife"),
                Decision::Search {
                    category: Category::Formal,
                    gender: Gender::Women
                }
            );
        }

        #[test]
        fn missing_gender_reprompts() {
            let state = DialogueState::AwaitingGender {
                category: Category::Formal,
            };
            assert_eq!(
                interpret(&state, "not sure"),
                Decision::Reprompt(RepromptReason::UnknownGender)
            );
        }
    }

    mod showing_products {
        use super::*;

        #[test]
        fn more_continues_after_current_page() {
            let state = DialogueState::BrowsingProducts {
                browsing: browsing(true),
            };
            assert_eq!(
                interpret(&state, "show more"),
                Decision::NextPage {
                    category: Category::Sports,
                    gender: Gender::Men,
                    offset: 6
                }
            );
        }

        #[test]
        fn more_on_last_page_is_reported() {
            let state = DialogueState::BrowsingProducts {
                browsing: browsing(false),
            };
            assert_eq!(interpret(&state, "more"), Decision::NoMorePages);
        }

        #[test]
        fn product_named_like_a_paging_word_is_selectable() {
            let mut page = page_of_three();
            page.items[2] = product("RUN-009", "Next Level");
            let state = DialogueState::BrowsingProducts {
                browsing: Browsing::new(Category::Sports, Gender::Men, 3, page),
            };
            assert_eq!(interpret(&state, "Next Level"), Decision::Select { index: 2 });
            assert_eq!(
                interpret(&state, "next"),
                Decision::NextPage {
                    category: Category::Sports,
                    gender: Gender::Men,
                    offset: 6
                }
            );
        }

        #[test]
        fn index_selects_and_out_of_range_reprompts() {
            let state = DialogueState::BrowsingProducts {
                browsing: browsing(true),
            };
            assert_eq!(interpret(&state, "2"), Decision::Select { index: 1 });
            assert_eq!(
                interpret(&state, "5"),
                Decision::Reprompt(RepromptReason::UnresolvedSelection)
            );
        }
    }

    mod order_details {
        use super::*;

        #[test]
        fn size_is_captured() {
            assert_eq!(
                interpret(&awaiting_size(), "9"),
                Decision::CaptureSize(ShoeSize::parse("9").unwrap())
            );
            assert_eq!(
                interpret(&awaiting_size(), "dunno"),
                Decision::Reprompt(RepromptReason::MissingSize)
            );
        }

        #[test]
        fn address_requires_pincode() {
            assert_eq!(
                interpret(&awaiting_address(), "my house"),
                Decision::Reprompt(RepromptReason::MissingPincode)
            );
            assert_eq!(
                interpret(&awaiting_address(), "my house, pincode 560001"),
                Decision::CaptureAddress {
                    address: "my house, pincode 560001".to_string(),
                    pincode: Pincode::parse("560001").unwrap()
                }
            );
        }

        #[test]
        fn confirmation_branches() {
            let state = awaiting_confirmation();
            assert_eq!(interpret(&state, "yes"), Decision::PlaceOrder);
            assert_eq!(interpret(&state, "no thanks"), Decision::Cancel);
            assert_eq!(
                interpret(&state, "hmm"),
                Decision::Reprompt(RepromptReason::UnclearConfirmation)
            );
        }
    }

    #[test]
    fn restart_wins_in_every_stage() {
        for state in all_states() {
            assert_eq!(interpret(&state, "/start"), Decision::Restart);
        }
    }

    proptest! {
        #[test]
        fn unrecognized_input_is_stable(text in "[qxzj ]{0,20}") {
            for state in all_states() {
                let first = interpret(&state, &text);
                let second = interpret(&state, &text);
                prop_assert_eq!(&first, &second);
                prop_assert!(first.is_reprompt(), "{:?} -> {:?}", state.stage(), first);
            }
        }
    }
}
