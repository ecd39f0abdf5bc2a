//! End-to-end flows over the cart store and checkout machine, using
//! in-memory storage in place of the browser's persistent store.

use anyhow::Result;
use rust_decimal::Decimal;

use vitrina::services::orders::PlacedOrder;
use vitrina::{
    CartStore, CheckoutError, CheckoutFlow, CheckoutStep, MemoryStorage, Money, PaymentInfo,
    ProductSnapshot, Redirect, ShippingInfo,
};

fn product(id: i64, price: i64, stock: u32) -> ProductSnapshot {
    ProductSnapshot {
        id,
        name: format!("Product {id}"),
        description: String::new(),
        price: Money::cop(Decimal::from(price)),
        stock,
        image_url: None,
    }
}

fn shipping() -> ShippingInfo {
    ShippingInfo {
        full_name: "Carlos Ruiz".into(),
        email: "carlos@example.com".into(),
        phone: "3109876543".into(),
        address: "Carrera 7 #45-10".into(),
        city: "Medellin".into(),
        zip_code: "050021".into(),
        notes: Some("call on arrival".into()),
    }
}

fn card(number: &str) -> PaymentInfo {
    PaymentInfo {
        card_number: number.into(),
        expiry: "11/99".into(),
        cvv: "456".into(),
        card_holder_name: "Carlos Ruiz".into(),
    }
}

#[test]
fn totals_at_the_free_shipping_boundary() {
    let mut store = CartStore::new(MemoryStorage::shared());
    store.add_item(&product(1, 50_000, 10), 2);

    let summary = store.summary();
    assert_eq!(summary.subtotal.amount(), Decimal::from(100_000u32));
    assert_eq!(summary.shipping.amount(), Decimal::ZERO);
    assert_eq!(summary.tax.amount(), Decimal::from(19_000u32));
    assert_eq!(summary.total.amount(), Decimal::from(119_000u32));
    assert!(summary.free_shipping);
    assert_eq!(summary.total_items, 2);
}

#[test]
fn approved_checkout_reaches_confirmed_and_empties_the_cart() -> Result<()> {
    let mut store = CartStore::new(MemoryStorage::shared());
    store.add_item(&product(1, 50_000, 10), 2);

    let mut flow = CheckoutFlow::begin(&store)?;
    flow.submit_shipping(shipping())?;
    let auth = flow.submit_payment(card("5555555555554444"))?;
    assert!(auth.approved);

    let request = flow.order_request(&store)?;
    assert_eq!(request.items.len(), 1);
    assert_eq!(request.items[0].product_id, 1);
    assert_eq!(request.items[0].quantity, 2);
    assert_eq!(request.payment_data.card_type, "MASTERCARD");

    // the backend accepted the order
    let placed = PlacedOrder {
        id: 301,
        total_amount: Decimal::from(119_000u32),
        receipt_url: Some("http://localhost:5000/receipts/301.pdf".into()),
    };
    flow.complete(placed, &mut store)?;

    assert_eq!(flow.step(), CheckoutStep::Confirmed);
    assert_eq!(flow.redirect(), Some(Redirect::Orders));
    assert!(store.cart().is_empty());
    assert_eq!(flow.order().map(|o| o.id), Some(301));
    Ok(())
}

#[test]
fn declined_checkout_stays_retryable_and_keeps_the_cart() -> Result<()> {
    let mut store = CartStore::new(MemoryStorage::shared());
    store.add_item(&product(1, 30_000, 10), 1);
    store.add_item(&product(2, 12_500, 10), 2);

    let mut flow = CheckoutFlow::begin(&store)?;
    flow.submit_shipping(shipping())?;
    let auth = flow.submit_payment(card("4000000000000002"))?;
    assert!(!auth.approved);
    assert_eq!(flow.step(), CheckoutStep::Processing);

    // only retry is available; order creation and back are rejected
    assert!(matches!(
        flow.order_request(&store),
        Err(CheckoutError::PaymentNotApproved)
    ));
    assert!(flow.back().is_err());

    flow.retry_payment()?;
    assert_eq!(flow.step(), CheckoutStep::Payment);

    // the cart was never touched
    assert_eq!(store.cart().quantity_of(1), 1);
    assert_eq!(store.cart().quantity_of(2), 2);

    // and a good card finishes the purchase
    let auth = flow.submit_payment(card("4111111111111111"))?;
    assert!(auth.approved);
    let placed = PlacedOrder { id: 302, total_amount: Decimal::ZERO, receipt_url: None };
    flow.complete(placed, &mut store)?;
    assert!(store.cart().is_empty());
    Ok(())
}

#[test]
fn empty_cart_never_reaches_shipping() {
    let store = CartStore::new(MemoryStorage::shared());
    let err = CheckoutFlow::begin(&store).unwrap_err();
    assert_eq!(err.redirect(), Some(Redirect::Catalog));
}

#[test]
fn stock_shortage_blocks_entry_with_product_names() {
    let mut store = CartStore::new(MemoryStorage::shared());
    store.add_item(&product(1, 1_000, 2), 5);
    match CheckoutFlow::begin(&store) {
        Err(CheckoutError::OutOfStock(names)) => assert!(names.contains("Product 1")),
        other => panic!("expected OutOfStock, got {other:?}"),
    }
}

#[test]
fn cart_survives_a_reload_mid_session() {
    let storage = MemoryStorage::shared();
    {
        let mut store = CartStore::new(storage.clone());
        store.add_item(&product(1, 9_900, 10), 3);
    }
    let store = CartStore::new(storage);
    assert_eq!(store.cart().quantity_of(1), 3);
    assert_eq!(store.summary().total_items, 3);
}
