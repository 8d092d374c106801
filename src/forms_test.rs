use super::*;
use serde_json::json;

fn form(name: &str, quantity: &str, price: &str) -> ItemForm {
    ItemForm { name: name.into(), quantity: quantity.into(), price: price.into(), ..ItemForm::default() }
}

// =============================================================
// Coercion
// =============================================================

#[test]
fn quantity_and_price_become_numbers() {
    let item = form("Bolt", "12", "2.50").to_new_item().unwrap();
    let body = serde_json::to_value(&item).unwrap();
    assert_eq!(body, json!({ "name": "Bolt", "quantity": 12, "price": 2.5 }));
}

#[test]
fn whitespace_around_numbers_is_ignored() {
    let item = form(" Bolt ", " 3 ", " 0.75 ").to_new_item().unwrap();
    assert_eq!(item.name, "Bolt");
    assert_eq!(item.quantity, 3);
    assert!((item.price - 0.75).abs() < f64::EPSILON);
}

#[test]
fn zero_quantity_and_price_are_allowed() {
    let item = form("Free sample", "0", "0").to_new_item().unwrap();
    assert_eq!(item.quantity, 0);
    assert!(item.price.abs() < f64::EPSILON);
}

#[test]
fn malformed_numbers_are_rejected() {
    for (quantity, price, field) in [("abc", "1", "quantity"), ("1.5", "1", "quantity"), ("-1", "1", "quantity"), ("1", "x", "price"), ("1", "-2", "price"), ("1", "NaN", "price"), ("1", "inf", "price")] {
        let err = form("Bolt", quantity, price).to_new_item().unwrap_err();
        assert!(matches!(err, FormError::Invalid { field: f, .. } if f == field), "{quantity} / {price}");
    }
}

#[test]
fn create_requires_name_quantity_price() {
    assert_eq!(form("", "1", "1").to_new_item(), Err(FormError::Required { field: "name" }));
    assert_eq!(form("Bolt", " ", "1").to_new_item(), Err(FormError::Required { field: "quantity" }));
    assert_eq!(form("Bolt", "1", "").to_new_item(), Err(FormError::Required { field: "price" }));
}

#[test]
fn optional_text_fields_included_when_filled() {
    let mut f = form("Bolt", "1", "1");
    f.location = "Shelf B".into();
    f.description = String::new();
    let item = f.to_new_item().unwrap();
    assert_eq!(item.location.as_deref(), Some("Shelf B"));
    assert_eq!(item.description, None);
}

// =============================================================
// Sparse patch
// =============================================================

#[test]
fn patch_omits_empty_fields() {
    let patch = ItemForm { price: "3".into(), ..ItemForm::default() }.to_patch().unwrap();
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "price": 3.0 }));
}

#[test]
fn patch_with_nothing_filled_is_empty() {
    let patch = ItemForm::default().to_patch().unwrap();
    assert!(patch.is_empty());
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({}));
}

#[test]
fn patch_coerces_filled_numbers() {
    let patch = ItemForm { quantity: "7".into(), name: "Nut".into(), ..ItemForm::default() }
        .to_patch()
        .unwrap();
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "name": "Nut", "quantity": 7 }));
}

#[test]
fn patch_rejects_malformed_number() {
    let err = ItemForm { quantity: "lots".into(), ..ItemForm::default() }.to_patch().unwrap_err();
    assert!(err.to_string().contains("quantity"));
}
