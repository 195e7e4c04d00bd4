use ndarray::arr1;

use crate::encoder::ActionEncoder;
use crate::error::DqnError;

fn encoder() -> ActionEncoder {
    ActionEncoder::new(["up", "right", "down", "left"]).unwrap()
}

#[test]
fn test_encode_uses_identity_rows() {
    let encoder = encoder();
    assert_eq!(encoder.encode("up").unwrap(), arr1(&[1.0, 0.0, 0.0, 0.0]));
    assert_eq!(encoder.encode("down").unwrap(), arr1(&[0.0, 0.0, 1.0, 0.0]));
    assert_eq!(encoder.encode("left").unwrap(), arr1(&[0.0, 0.0, 0.0, 1.0]));
}

#[test]
fn test_decode_inverts_encode() {
    let encoder = encoder();
    for name in encoder.names() {
        let one_hot = encoder.encode(name).unwrap();
        assert_eq!(one_hot.sum(), 1.0);
        assert_eq!(encoder.decode(one_hot.view()).unwrap(), name);
    }
}

#[test]
fn test_unknown_action() {
    assert_eq!(
        encoder().encode("jump").unwrap_err(),
        DqnError::InvalidAction { name: "jump".to_string() }
    );
}

#[test]
fn test_decode_rejects_non_one_hot() {
    let encoder = encoder();
    assert!(matches!(
        encoder.decode(arr1(&[0.0, 0.0, 0.0, 0.0]).view()),
        Err(DqnError::InvalidAction { .. })
    ));
    assert!(matches!(
        encoder.decode(arr1(&[1.0, 1.0, 0.0, 0.0]).view()),
        Err(DqnError::InvalidAction { .. })
    ));
    assert!(matches!(
        encoder.decode(arr1(&[0.5, 0.0, 0.0, 0.0]).view()),
        Err(DqnError::InvalidAction { .. })
    ));
    assert!(matches!(
        encoder.decode(arr1(&[1.0, 0.0]).view()),
        Err(DqnError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_index_lookups() {
    let encoder = encoder();
    assert_eq!(encoder.len(), 4);
    assert_eq!(encoder.index_of("right").unwrap(), 1);
    assert_eq!(encoder.name(3).unwrap(), "left");
    assert!(encoder.name(4).is_err());
}

#[test]
fn test_empty_and_duplicate_sets_rejected() {
    assert!(matches!(
        ActionEncoder::new(Vec::<String>::new()),
        Err(DqnError::Configuration { .. })
    ));
    assert!(matches!(
        ActionEncoder::new(["up", "down", "up"]),
        Err(DqnError::Configuration { .. })
    ));
}
