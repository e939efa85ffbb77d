//! Optimistic cart line edits.
//!
//! Each line is either [`LineEntry::Confirmed`] with the server's state, or
//! [`LineEntry::Pending`] with both the last confirmed state and the state
//! predicted by the newest unanswered edit. The display always shows the
//! prediction, so the shopper sees their edit immediately.
//!
//! Responses are matched to submissions by [`SubmissionId`]:
//!
//! - the newest submission succeeding confirms the line;
//! - an older submission succeeding only refreshes the confirmed base under
//!   the newer prediction, so the display never flickers back;
//! - the newest submission failing reverts to the confirmed base and records
//!   an inline error;
//! - anything at or below the line's last settled submission is ignored.
//!
//! A mutation response carries a whole-cart snapshot taken when that
//! submission was applied. Other lines only take values from a snapshot at
//! least as new as the one they last observed, and lines removed by a newer
//! submission stay removed.

use crate::domain::error::{Result, StorefrontError};
use crate::domain::{Cart, CartLine, DiscountCode, LineId, Money};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Identity of one submitted edit. Strictly increasing per cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(u64);

impl SubmissionId {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// A local edit to a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEdit {
    Remove,
    /// Set an absolute quantity. Zero predicts removal.
    Quantity(u32),
}

/// Optimistic state of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEntry {
    Confirmed(CartLine),
    Pending {
        /// Last server-confirmed state. `None` once the server no longer has the line.
        confirmed: Option<CartLine>,
        /// State the newest edit will produce. `None` predicts removal.
        predicted: Option<CartLine>,
        submission: SubmissionId,
        submitted_at: Instant,
    },
}

impl LineEntry {
    /// What the shopper should see. `None` means the line is hidden.
    #[must_use]
    pub const fn displayed(&self) -> Option<&CartLine> {
        match self {
            Self::Confirmed(line) => Some(line),
            Self::Pending { predicted, .. } => predicted.as_ref(),
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    const fn confirmed(&self) -> Option<&CartLine> {
        match self {
            Self::Confirmed(line) => Some(line),
            Self::Pending { confirmed, .. } => confirmed.as_ref(),
        }
    }
}

/// What a response did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Newest edit confirmed; the line is settled.
    Confirmed,
    /// Older edit confirmed; a newer edit is still pending on top.
    BaseRefreshed,
    /// Newest edit rejected; the line reverted and carries an error.
    Reverted,
    /// Older edit rejected; superseded, nothing shown.
    Superseded,
    /// Response is older than the line's settled state, or the line is gone.
    Ignored,
}

/// Server response to a submitted edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied(Cart),
    Rejected(String),
}

#[derive(Debug, Clone)]
struct LineSlot {
    entry: LineEntry,
    error: Option<String>,
    settled: Option<SubmissionId>,
    /// Submission whose snapshot last wrote this line.
    observed: Option<SubmissionId>,
}

/// A line as it should be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub line: CartLine,
    /// When the unanswered edit was submitted, if one is pending.
    pub pending_since: Option<Instant>,
    pub error: Option<String>,
}

/// Cart state with optimistic edits layered over the last server state.
#[derive(Debug, Clone, Default)]
pub struct OptimisticCart {
    cart_id: String,
    currency_code: String,
    discount_codes: Vec<DiscountCode>,
    checkout_url: Option<String>,
    lines: Vec<(LineId, LineSlot)>,
    /// Snapshot that last wrote the cart-level fields.
    cart_observed: SubmissionId,
    /// Lines removed by a confirmed submission, kept out of older snapshots.
    removed: Vec<(LineId, SubmissionId)>,
    last_submission: u64,
    /// Errors for lines that disappeared while reverting.
    orphan_errors: Vec<String>,
}

impl OptimisticCart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_cart(cart: Cart) -> Self {
        let mut optimistic = Self::new();
        optimistic.reconcile(cart);
        optimistic
    }

    /// Records a local edit and returns its submission id.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownLine`] if the cart has no such line.
    pub fn submit(&mut self, line_id: &LineId, edit: LineEdit, now: Instant) -> Result<SubmissionId> {
        let slot = self
            .slot_mut(line_id)
            .ok_or_else(|| StorefrontError::UnknownLine(line_id.to_string()))?;

        let confirmed = slot.entry.confirmed().cloned();
        let basis = slot.entry.displayed().or(confirmed.as_ref()).cloned();

        let predicted = match edit {
            LineEdit::Remove | LineEdit::Quantity(0) => None,
            LineEdit::Quantity(quantity) => basis.map(|line| line.with_quantity(quantity)),
        };

        self.last_submission += 1;
        let submission = SubmissionId(self.last_submission);

        if let Some(slot) = self.slot_mut(line_id) {
            slot.entry = LineEntry::Pending {
                confirmed,
                predicted,
                submission,
                submitted_at: now,
            };
            slot.error = None;
        }

        tracing::debug!(line_id = %line_id, submission = %submission, edit = ?edit, "cart edit submitted");
        Ok(submission)
    }

    /// Applies the server's answer to `submission` on `line_id`.
    pub fn resolve(&mut self, line_id: &LineId, submission: SubmissionId, outcome: MutationOutcome) -> ResolveOutcome {
        let _span = tracing::debug_span!("cart_resolve", line_id = %line_id, submission = %submission).entered();

        let Some(slot) = self.slot_mut(line_id) else {
            tracing::debug!("response for a line no longer in the cart");
            return ResolveOutcome::Ignored;
        };

        if slot.settled.is_some_and(|settled| submission <= settled) {
            tracing::debug!(settled = ?slot.settled, "response older than settled state");
            return ResolveOutcome::Ignored;
        }

        let newest = match &slot.entry {
            LineEntry::Pending { submission: pending, .. } => *pending,
            LineEntry::Confirmed(_) => {
                tracing::debug!("no pending edit for response");
                return ResolveOutcome::Ignored;
            }
        };
        if submission > newest {
            return ResolveOutcome::Ignored;
        }

        slot.settled = Some(submission);
        let is_newest = submission == newest;

        match (outcome, is_newest) {
            (MutationOutcome::Applied(cart), true) => {
                match cart.line(line_id).cloned() {
                    Some(server) => {
                        slot.entry = LineEntry::Confirmed(server);
                        slot.error = None;
                        slot.observed = slot.observed.max(Some(submission));
                    }
                    None => self.forget(line_id, submission),
                }
                self.merge(cart, submission, false);
                ResolveOutcome::Confirmed
            }
            (MutationOutcome::Applied(cart), false) => {
                self.merge(cart, submission, false);
                ResolveOutcome::BaseRefreshed
            }
            (MutationOutcome::Rejected(message), true) => {
                tracing::debug!(error = %message, "newest edit rejected, reverting");
                match slot.entry.confirmed().cloned() {
                    Some(confirmed) => {
                        slot.entry = LineEntry::Confirmed(confirmed);
                        slot.error = Some(message);
                    }
                    None => {
                        self.forget(line_id, submission);
                        self.orphan_errors.push(message);
                    }
                }
                ResolveOutcome::Reverted
            }
            (MutationOutcome::Rejected(message), false) => {
                tracing::debug!(error = %message, "superseded edit rejected");
                ResolveOutcome::Superseded
            }
        }
    }

    /// Replaces server state wholesale, keeping pending predictions on top.
    ///
    /// Confirmed lines take the server's version (or disappear). Pending
    /// lines only have their confirmed base refreshed. Server lines not yet
    /// known locally are appended.
    pub fn reconcile(&mut self, cart: Cart) {
        self.merge(cart, SubmissionId(self.last_submission), true);
    }

    /// Applies a snapshot taken at `at`.
    ///
    /// Unless `authoritative`, lines observed by a newer snapshot are left
    /// alone and lines removed by a newer submission are not re-added.
    fn merge(&mut self, cart: Cart, at: SubmissionId, authoritative: bool) {
        let outdated = |observed: Option<SubmissionId>| !authoritative && observed.is_some_and(|seen| seen > at);

        if authoritative || at >= self.cart_observed {
            self.cart_id = cart.id;
            self.currency_code = cart.currency_code;
            self.discount_codes = cart.discount_codes;
            self.checkout_url = cart.checkout_url;
            self.cart_observed = at;
        }

        let mut server_lines = cart.lines;
        let mut dropped = Vec::new();

        self.lines.retain_mut(|(id, slot)| {
            let server_line = server_lines
                .iter()
                .position(|line| &line.id == id)
                .map(|index| server_lines.remove(index));

            if outdated(slot.observed) {
                tracing::trace!(line_id = %id, observed = ?slot.observed, "snapshot older than line");
                return true;
            }
            slot.observed = Some(at);

            match (&mut slot.entry, server_line) {
                (LineEntry::Confirmed(line), Some(server)) => {
                    *line = server;
                    true
                }
                (LineEntry::Confirmed(_), None) => {
                    tracing::debug!(line_id = %id, "line removed by server");
                    dropped.push(id.clone());
                    false
                }
                (LineEntry::Pending { confirmed, .. }, server) => {
                    *confirmed = server;
                    true
                }
            }
        });

        if authoritative {
            self.removed.clear();
        }
        self.removed.extend(dropped.into_iter().map(|id| (id, at)));

        for line in server_lines {
            let removed_later = self.removed.iter().any(|(id, by)| id == &line.id && *by > at);
            if !authoritative && removed_later {
                tracing::debug!(line_id = %line.id, "line removed by a newer edit");
                continue;
            }
            self.lines.push((
                line.id.clone(),
                LineSlot {
                    entry: LineEntry::Confirmed(line),
                    error: None,
                    settled: None,
                    observed: Some(at),
                },
            ));
        }

        tracing::debug!(lines = self.lines.len(), at = %at, "cart reconciled");
    }

    fn forget(&mut self, line_id: &LineId, submission: SubmissionId) {
        self.lines.retain(|(id, _)| id != line_id);
        self.removed.push((line_id.clone(), submission));
    }

    /// Lines to display, in cart order, hiding predicted removals.
    #[must_use]
    pub fn display_lines(&self) -> Vec<DisplayLine> {
        self.lines
            .iter()
            .filter_map(|(_, slot)| {
                let line = slot.entry.displayed()?.clone();
                let pending_since = match &slot.entry {
                    LineEntry::Pending { submitted_at, .. } => Some(*submitted_at),
                    LineEntry::Confirmed(_) => None,
                };
                Some(DisplayLine {
                    line,
                    pending_since,
                    error: slot.error.clone(),
                })
            })
            .collect()
    }

    /// Quantity currently displayed for a line, `None` if hidden or unknown.
    #[must_use]
    pub fn displayed_quantity(&self, line_id: &LineId) -> Option<u32> {
        self.entry(line_id)?.displayed().map(|line| line.quantity)
    }

    #[must_use]
    pub fn entry(&self, line_id: &LineId) -> Option<&LineEntry> {
        self.lines.iter().find(|(id, _)| id == line_id).map(|(_, slot)| &slot.entry)
    }

    /// Sum of displayed line totals.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .filter_map(|(_, slot)| slot.entry.displayed())
            .map(CartLine::line_total)
            .sum()
    }

    /// Discount codes the API reports as applicable.
    pub fn applied_discounts(&self) -> impl Iterator<Item = &DiscountCode> {
        self.discount_codes.iter().filter(|code| code.applicable)
    }

    #[must_use]
    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    #[must_use]
    pub fn checkout_url(&self) -> Option<&str> {
        self.checkout_url.as_deref()
    }

    #[must_use]
    pub fn cart_id(&self) -> &str {
        &self.cart_id
    }

    /// Errors from reverted edits whose line no longer exists.
    #[must_use]
    pub fn orphan_errors(&self) -> &[String] {
        &self.orphan_errors
    }

    pub fn dismiss_errors(&mut self) {
        self.orphan_errors.clear();
        for (_, slot) in &mut self.lines {
            slot.error = None;
        }
    }

    fn slot_mut(&mut self, line_id: &LineId) -> Option<&mut LineSlot> {
        self.lines
            .iter_mut()
            .find(|(id, _)| id == line_id)
            .map(|(_, slot)| slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, quantity: u32) -> CartLine {
        CartLine {
            id: LineId::new(id),
            merchandise_id: format!("variant-{id}"),
            title: format!("Item {id}"),
            quantity,
            unit_price: Money::from_major(100),
            quantity_available: None,
        }
    }

    fn cart(lines: Vec<CartLine>) -> Cart {
        Cart {
            id: "cart-1".into(),
            lines,
            discount_codes: vec![],
            currency_code: "SAR".into(),
            checkout_url: None,
        }
    }

    #[test]
    fn submit_shows_prediction_immediately() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 2)]));
        let id = LineId::new("a");
        c.submit(&id, LineEdit::Quantity(3), Instant::now()).unwrap();

        assert_eq!(c.displayed_quantity(&id), Some(3));
        assert_eq!(c.subtotal(), Money::from_major(300));
        assert!(c.entry(&id).unwrap().is_pending());
    }

    #[test]
    fn in_order_responses_never_flicker() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 2)]));
        let id = LineId::new("a");
        let now = Instant::now();

        let s1 = c.submit(&id, LineEdit::Quantity(3), now).unwrap();
        let s2 = c.submit(&id, LineEdit::Quantity(4), now).unwrap();

        assert_eq!(c.resolve(&id, s1, MutationOutcome::Applied(cart(vec![line("a", 3)]))), ResolveOutcome::BaseRefreshed);
        assert_eq!(c.displayed_quantity(&id), Some(4));

        assert_eq!(c.resolve(&id, s2, MutationOutcome::Applied(cart(vec![line("a", 4)]))), ResolveOutcome::Confirmed);
        assert_eq!(c.displayed_quantity(&id), Some(4));
        assert!(!c.entry(&id).unwrap().is_pending());
    }

    #[test]
    fn out_of_order_older_response_is_ignored() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 2)]));
        let id = LineId::new("a");
        let now = Instant::now();

        let s1 = c.submit(&id, LineEdit::Quantity(3), now).unwrap();
        let s2 = c.submit(&id, LineEdit::Quantity(4), now).unwrap();

        c.resolve(&id, s2, MutationOutcome::Applied(cart(vec![line("a", 4)])));
        assert_eq!(c.resolve(&id, s1, MutationOutcome::Applied(cart(vec![line("a", 3)]))), ResolveOutcome::Ignored);
        assert_eq!(c.displayed_quantity(&id), Some(4));
    }

    #[test]
    fn rejection_of_newest_reverts_with_error() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 2)]));
        let id = LineId::new("a");

        let s1 = c.submit(&id, LineEdit::Quantity(9), Instant::now()).unwrap();
        assert_eq!(c.resolve(&id, s1, MutationOutcome::Rejected("Only 5 left".into())), ResolveOutcome::Reverted);

        let shown = c.display_lines();
        assert_eq!(shown[0].line.quantity, 2);
        assert_eq!(shown[0].error.as_deref(), Some("Only 5 left"));
    }

    #[test]
    fn rejection_of_superseded_edit_is_not_shown() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 2)]));
        let id = LineId::new("a");
        let now = Instant::now();

        let s1 = c.submit(&id, LineEdit::Quantity(3), now).unwrap();
        let _s2 = c.submit(&id, LineEdit::Quantity(4), now).unwrap();

        assert_eq!(c.resolve(&id, s1, MutationOutcome::Rejected("busy".into())), ResolveOutcome::Superseded);
        assert_eq!(c.displayed_quantity(&id), Some(4));
        assert!(c.display_lines()[0].error.is_none());
    }

    #[test]
    fn removal_hides_line_then_confirms() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 1), line("b", 1)]));
        let id = LineId::new("a");

        let s1 = c.submit(&id, LineEdit::Remove, Instant::now()).unwrap();
        assert_eq!(c.display_lines().len(), 1);
        assert_eq!(c.displayed_quantity(&id), None);

        assert_eq!(c.resolve(&id, s1, MutationOutcome::Applied(cart(vec![line("b", 1)]))), ResolveOutcome::Confirmed);
        assert!(c.entry(&id).is_none());
        assert_eq!(c.display_lines().len(), 1);
    }

    #[test]
    fn quantity_zero_predicts_removal() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 1)]));
        let id = LineId::new("a");
        c.submit(&id, LineEdit::Quantity(0), Instant::now()).unwrap();
        assert!(c.display_lines().is_empty());
    }

    #[test]
    fn unknown_line_is_an_error() {
        let mut c = OptimisticCart::from_cart(cart(vec![]));
        assert!(matches!(
            c.submit(&LineId::new("zz"), LineEdit::Remove, Instant::now()),
            Err(StorefrontError::UnknownLine(_))
        ));
    }

    #[test]
    fn older_snapshot_keeps_newer_confirmation_on_other_line() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 1), line("b", 1)]));
        let (a, b) = (LineId::new("a"), LineId::new("b"));
        let now = Instant::now();

        let s1 = c.submit(&a, LineEdit::Quantity(2), now).unwrap();
        let s2 = c.submit(&b, LineEdit::Quantity(5), now).unwrap();

        assert_eq!(c.resolve(&b, s2, MutationOutcome::Applied(cart(vec![line("a", 2), line("b", 5)]))), ResolveOutcome::Confirmed);
        assert_eq!(c.resolve(&a, s1, MutationOutcome::Applied(cart(vec![line("a", 2), line("b", 1)]))), ResolveOutcome::Confirmed);

        assert_eq!(c.displayed_quantity(&a), Some(2));
        assert_eq!(c.displayed_quantity(&b), Some(5));
        assert!(!c.entry(&b).unwrap().is_pending());
    }

    #[test]
    fn older_snapshot_does_not_restore_removed_line() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 1), line("b", 1)]));
        let (a, b) = (LineId::new("a"), LineId::new("b"));
        let now = Instant::now();

        let s1 = c.submit(&a, LineEdit::Quantity(2), now).unwrap();
        let s2 = c.submit(&b, LineEdit::Remove, now).unwrap();

        c.resolve(&b, s2, MutationOutcome::Applied(cart(vec![line("a", 2)])));
        c.resolve(&a, s1, MutationOutcome::Applied(cart(vec![line("a", 2), line("b", 1)])));

        assert!(c.entry(&b).is_none());
        assert_eq!(c.display_lines().len(), 1);
        assert_eq!(c.subtotal(), Money::from_major(200));
    }

    #[test]
    fn full_load_restores_line_removed_elsewhere() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 1), line("b", 1)]));
        let b = LineId::new("b");

        let s1 = c.submit(&b, LineEdit::Remove, Instant::now()).unwrap();
        c.resolve(&b, s1, MutationOutcome::Applied(cart(vec![line("a", 1)])));
        c.reconcile(cart(vec![line("a", 1), line("b", 3)]));

        assert_eq!(c.displayed_quantity(&b), Some(3));
    }

    #[test]
    fn reconcile_keeps_pending_predictions() {
        let mut c = OptimisticCart::from_cart(cart(vec![line("a", 2), line("b", 1)]));
        let a = LineId::new("a");
        c.submit(&a, LineEdit::Quantity(5), Instant::now()).unwrap();

        c.reconcile(cart(vec![line("a", 2), line("b", 3), line("c", 1)]));

        assert_eq!(c.displayed_quantity(&a), Some(5));
        assert_eq!(c.displayed_quantity(&LineId::new("b")), Some(3));
        assert_eq!(c.displayed_quantity(&LineId::new("c")), Some(1));
    }
}
