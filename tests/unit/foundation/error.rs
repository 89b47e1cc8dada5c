use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TilewallError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TilewallError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        TilewallError::invalid_step("x")
            .to_string()
            .contains("invalid animation step:")
    );
    assert!(
        TilewallError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        TilewallError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TilewallError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
