//! Optimistic cart edits through the coordinator and the catalog worker.

use futures_executor::block_on;
use std::time::Instant;
use storefront_core::cart::CartSummary;
use storefront_core::client::{Catalog, CatalogClient};
use storefront_core::domain::{Cart, CartLine, DiscountCode, LineId, Money};
use storefront_core::store::{Overlay, UiAction};
use storefront_core::worker::{StorefrontWorker, WorkerMessage, WorkerResponse};
use storefront_core::{handle_event, Action, AppState, Event, LineControl, Settings, Translations};

fn line(id: &str, title: &str, quantity: u32, price: i64, available: Option<u32>) -> CartLine {
    CartLine {
        id: LineId::new(id),
        merchandise_id: format!("variant-{id}"),
        title: title.into(),
        quantity,
        unit_price: Money::from_major(price),
        quantity_available: available,
    }
}

fn catalog() -> Catalog {
    Catalog {
        cart: Cart {
            id: "cart-1".into(),
            lines: vec![
                line("l1", "Silk Scarf", 2, 60, Some(10)),
                line("l2", "Pearl Earrings", 1, 240, Some(3)),
            ],
            discount_codes: vec![
                DiscountCode {
                    code: "WELCOME10".into(),
                    applicable: true,
                },
                DiscountCode {
                    code: "EXPIRED".into(),
                    applicable: false,
                },
            ],
            currency_code: "SAR".into(),
            checkout_url: Some("https://shop.example/checkout/1".into()),
        },
        ..Catalog::default()
    }
}

struct Harness {
    state: AppState,
    worker: StorefrontWorker<CatalogClient>,
}

impl Harness {
    fn loaded() -> Self {
        let mut harness = Self {
            state: AppState::new(Settings::default()),
            worker: StorefrontWorker::new(CatalogClient::new(catalog())),
        };
        let response = harness.run(WorkerMessage::load_cart());
        harness.deliver(response);
        harness
    }

    fn run(&mut self, message: WorkerMessage) -> WorkerResponse {
        block_on(self.worker.handle_message(message))
    }

    fn deliver(&mut self, response: WorkerResponse) -> bool {
        handle_event(&mut self.state, &Event::WorkerResponse(response)).unwrap().0
    }

    /// Applies a control and returns the message it posted.
    fn edit(&mut self, id: &str, control: LineControl) -> WorkerMessage {
        let (_, actions) = handle_event(
            &mut self.state,
            &Event::CartEdit {
                line_id: LineId::new(id),
                control,
                now: Instant::now(),
            },
        )
        .unwrap();

        actions
            .into_iter()
            .find_map(|action| match action {
                Action::PostToWorker(message) => Some(message),
                _ => None,
            })
            .expect("edit should post a mutation")
    }

    fn shown(&self, id: &str) -> Option<u32> {
        self.state.cart().displayed_quantity(&LineId::new(id))
    }
}

#[test]
fn rapid_increments_never_flicker_back() {
    let mut h = Harness::loaded();

    let first = h.edit("l1", LineControl::Increment);
    let second = h.edit("l1", LineControl::Increment);
    assert_eq!(h.shown("l1"), Some(4));

    let response = h.run(first);
    h.deliver(response);
    assert_eq!(h.shown("l1"), Some(4), "older confirmation must not show 3");
    assert!(h.state.cart().entry(&LineId::new("l1")).unwrap().is_pending());

    let response = h.run(second);
    h.deliver(response);
    assert_eq!(h.shown("l1"), Some(4));
    assert!(!h.state.cart().entry(&LineId::new("l1")).unwrap().is_pending());
}

#[test]
fn increment_then_decrement_converges() {
    let mut h = Harness::loaded();

    let up = h.edit("l1", LineControl::Increment);
    let down = h.edit("l1", LineControl::Decrement);
    assert_eq!(h.shown("l1"), Some(2));

    for message in [up, down] {
        let response = h.run(message);
        h.deliver(response);
    }

    assert_eq!(h.shown("l1"), Some(2));
    let response = h.run(WorkerMessage::load_cart());
    match response {
        WorkerResponse::CartLoaded { cart } => {
            assert_eq!(cart.line(&LineId::new("l1")).unwrap().quantity, 2);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn responses_arriving_newest_first_keep_latest_quantity() {
    let mut h = Harness::loaded();

    let first = h.edit("l1", LineControl::Increment);
    let second = h.edit("l1", LineControl::Increment);
    let first_response = h.run(first);
    let second_response = h.run(second);

    assert!(h.deliver(second_response));
    assert!(!h.deliver(first_response), "overtaken confirmation is ignored");
    assert_eq!(h.shown("l1"), Some(4));
}

#[test]
fn rejected_edit_reverts_with_message_until_dismissed() {
    let mut h = Harness::loaded();

    let over_stock = h.edit("l2", LineControl::SetQuantity(5));
    assert_eq!(h.shown("l2"), Some(5));

    let response = h.run(over_stock);
    assert!(matches!(response, WorkerResponse::CartMutationRejected { .. }));
    assert!(h.deliver(response));

    assert_eq!(h.shown("l2"), Some(1));
    let lines = h.state.cart().display_lines();
    let earrings = lines.iter().find(|l| l.line.id == LineId::new("l2")).unwrap();
    assert_eq!(earrings.error.as_deref(), Some("Only 3 of Pearl Earrings available"));

    let (render, _) = handle_event(&mut h.state, &Event::DismissCartErrors).unwrap();
    assert!(render);
    assert!(h.state.cart().display_lines().iter().all(|l| l.error.is_none()));
}

#[test]
fn removal_hides_line_and_updates_summary_immediately() {
    let mut h = Harness::loaded();

    let removal = h.edit("l2", LineControl::Remove);
    assert!(matches!(removal, WorkerMessage::RemoveCartLine { .. }));
    assert_eq!(h.shown("l2"), None);

    let summary = CartSummary::of(h.state.cart(), Money::from_major(300), "SAR");
    assert_eq!(summary.line_count, 1);
    assert_eq!(summary.subtotal, Money::from_major(120));
    assert_eq!(summary.applied_discounts, vec!["WELCOME10".to_string()]);
    assert!(!summary.free_shipping.qualified);

    let response = h.run(removal);
    h.deliver(response);
    assert!(h.state.cart().entry(&LineId::new("l2")).is_none());
}

#[test]
fn drawer_marks_pending_lines_and_disables_controls() {
    let mut h = Harness::loaded();
    handle_event(
        &mut h.state,
        &Event::Ui {
            action: UiAction::Open(Overlay::Cart),
            now: Instant::now(),
        },
    )
    .unwrap();

    h.edit("l2", LineControl::SetQuantity(3));

    let vm = h.state.compute_viewmodel(&Translations::default());
    let drawer = vm.cart.expect("cart drawer open");

    let scarf = drawer.lines.iter().find(|l| l.id == LineId::new("l1")).unwrap();
    assert!(scarf.updating.is_none());
    assert!(scarf.can_decrement);

    let earrings = drawer.lines.iter().find(|l| l.id == LineId::new("l2")).unwrap();
    assert_eq!(earrings.quantity, 3);
    assert_eq!(earrings.updating.as_deref(), Some("Updating..."));
    assert!(!earrings.can_increment, "at available stock");

    assert_eq!(drawer.subtotal, "840.00 SAR");
    assert_eq!(drawer.free_shipping_percent, 100);
    assert_eq!(vm.header.cart_count, 5);
    assert_eq!(drawer.checkout_url.as_deref(), Some("https://shop.example/checkout/1"));
}

#[test]
fn late_response_for_one_line_keeps_newer_quantity_on_another() {
    let mut h = Harness::loaded();

    let scarf = h.edit("l1", LineControl::Increment);
    let earrings = h.edit("l2", LineControl::SetQuantity(3));
    let scarf_response = h.run(scarf);
    let earrings_response = h.run(earrings);

    assert!(h.deliver(earrings_response));
    assert!(h.deliver(scarf_response));

    assert_eq!(h.shown("l1"), Some(3));
    assert_eq!(h.shown("l2"), Some(3), "older snapshot must not restore quantity 1");

    let summary = CartSummary::of(h.state.cart(), Money::from_major(300), "SAR");
    assert_eq!(summary.subtotal, Money::from_major(900));
}

#[test]
fn late_response_for_one_line_keeps_another_removed() {
    let mut h = Harness::loaded();

    let scarf = h.edit("l1", LineControl::Increment);
    let removal = h.edit("l2", LineControl::Remove);
    let scarf_response = h.run(scarf);
    let removal_response = h.run(removal);

    h.deliver(removal_response);
    h.deliver(scarf_response);

    assert!(h.state.cart().entry(&LineId::new("l2")).is_none());
    let lines = h.state.cart().display_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].line.id, LineId::new("l1"));
    assert_eq!(lines[0].line.quantity, 3);
}
