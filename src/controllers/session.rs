//! Modal Session
//!
//! Open/closed and create/edit state shared by the editor modals. Every
//! transition that starts a new flow bumps the generation; responses that
//! carry an older ticket are discarded.

/// Where a modal is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    CreatePending,
    EditLoading { id: u32 },
    EditPending { id: u32 },
}

/// Generation token handed to an async request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalSession {
    state: ModalState,
    generation: u64,
    submitting: bool,
}

impl ModalSession {
    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ModalState::EditLoading { .. })
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.state, ModalState::EditLoading { .. } | ModalState::EditPending { .. })
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn advance(&mut self, state: ModalState) -> Ticket {
        self.generation += 1;
        self.state = state;
        self.submitting = false;
        Ticket(self.generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    pub fn open_create(&mut self) {
        self.advance(ModalState::CreatePending);
    }

    pub fn begin_edit(&mut self, id: u32) -> Ticket {
        self.advance(ModalState::EditLoading { id })
    }

    /// Detail arrived; false when the ticket is stale
    pub fn finish_load(&mut self, ticket: Ticket) -> bool {
        match self.state {
            ModalState::EditLoading { id } if self.is_current(ticket) => {
                self.state = ModalState::EditPending { id };
                true
            }
            _ => false,
        }
    }

    /// Detail fetch failed; closes the modal when the ticket is current
    pub fn fail_load(&mut self, ticket: Ticket) -> bool {
        if self.is_loading() && self.is_current(ticket) {
            self.advance(ModalState::Closed);
            return true;
        }
        false
    }

    /// Start a submit; refused while closed, loading or already submitting
    pub fn begin_submit(&mut self) -> Option<Ticket> {
        match self.state {
            ModalState::CreatePending | ModalState::EditPending { .. } if !self.submitting => {
                self.submitting = true;
                Some(Ticket(self.generation))
            }
            _ => None,
        }
    }

    /// Submit finished: success closes, failure returns to the pending state
    pub fn finish_submit(&mut self, ticket: Ticket, ok: bool) -> bool {
        if !self.is_current(ticket) || !self.submitting {
            return false;
        }
        if ok {
            self.advance(ModalState::Closed);
        } else {
            self.submitting = false;
        }
        true
    }

    pub fn close(&mut self) {
        self.advance(ModalState::Closed);
    }
}
