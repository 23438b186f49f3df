//! Modal lifecycle state machine.
//!
//! At most one modal is visible at a time. The only permitted stacking
//! is a rule form opened from the rule list: the list is hidden while
//! the form is up and restored when it closes. Opening anything else
//! while a modal is up is rejected.

/// Create vs. edit mode for record forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalMode {
    #[default]
    Create,
    Edit,
}

impl ModalMode {
    pub fn title_verb(self) -> &'static str {
        match self {
            Self::Create => "New",
            Self::Edit => "Edit",
        }
    }
}

/// The currently visible modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    DeviceForm(ModalMode),
    PointForm(ModalMode),
    RuleList,
    RuleForm {
        mode: ModalMode,
        /// Whether the rule list is hidden underneath and must be
        /// restored when this form closes.
        over_list: bool,
    },
}

/// Owns the open/close transitions and enforces mutual exclusion.
#[derive(Debug, Default)]
pub struct ModalStack {
    current: Option<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible modal, if any.
    pub fn active(&self) -> Option<Modal> {
        self.current
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Try to open a modal. Returns `false` when rejected: something
    /// else is already up, unless this is a rule form stacking over the
    /// rule list.
    pub fn open(&mut self, modal: Modal) -> bool {
        match (self.current, modal) {
            (None, m) => {
                // Stacked opens only make sense from the list.
                if let Modal::RuleForm { over_list: true, .. } = m {
                    return false;
                }
                self.current = Some(m);
                true
            }
            (Some(Modal::RuleList), Modal::RuleForm { mode, .. }) => {
                self.current = Some(Modal::RuleForm {
                    mode,
                    over_list: true,
                });
                true
            }
            _ => false,
        }
    }

    /// Close the topmost modal. A rule form that covered the list
    /// restores it; everything else leaves no modal visible.
    pub fn close(&mut self) {
        self.current = match self.current {
            Some(Modal::RuleForm { over_list: true, .. }) => Some(Modal::RuleList),
            _ => None,
        };
    }

    /// Close everything, including a restored list underneath.
    pub fn close_all(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{Modal, ModalMode, ModalStack};

    #[test]
    fn only_one_modal_at_a_time() {
        let mut stack = ModalStack::new();
        assert!(stack.open(Modal::DeviceForm(ModalMode::Create)));
        assert!(!stack.open(Modal::PointForm(ModalMode::Create)));
        assert!(!stack.open(Modal::RuleList));
        assert_eq!(stack.active(), Some(Modal::DeviceForm(ModalMode::Create)));

        stack.close();
        assert!(!stack.is_open());
        assert!(stack.open(Modal::PointForm(ModalMode::Edit)));
    }

    #[test]
    fn rule_form_stacks_over_rule_list_and_restores_it() {
        let mut stack = ModalStack::new();
        assert!(stack.open(Modal::RuleList));
        assert!(stack.open(Modal::RuleForm {
            mode: ModalMode::Edit,
            over_list: false,
        }));
        assert_eq!(
            stack.active(),
            Some(Modal::RuleForm {
                mode: ModalMode::Edit,
                over_list: true,
            })
        );

        // Closing the form brings the list back.
        stack.close();
        assert_eq!(stack.active(), Some(Modal::RuleList));

        stack.close();
        assert!(!stack.is_open());
    }

    #[test]
    fn rule_form_does_not_stack_over_other_modals() {
        let mut stack = ModalStack::new();
        assert!(stack.open(Modal::DeviceForm(ModalMode::Edit)));
        assert!(!stack.open(Modal::RuleForm {
            mode: ModalMode::Create,
            over_list: false,
        }));
    }

    #[test]
    fn standalone_rule_form_closes_to_nothing() {
        let mut stack = ModalStack::new();
        assert!(stack.open(Modal::RuleForm {
            mode: ModalMode::Create,
            over_list: false,
        }));
        stack.close();
        assert!(!stack.is_open());
    }

    #[test]
    fn close_all_discards_the_hidden_list() {
        let mut stack = ModalStack::new();
        assert!(stack.open(Modal::RuleList));
        assert!(stack.open(Modal::RuleForm {
            mode: ModalMode::Create,
            over_list: false,
        }));
        stack.close_all();
        assert!(!stack.is_open());
    }
}
