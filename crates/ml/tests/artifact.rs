use ml::artifact::{self, ARTIFACT_VERSION};
use ml::{ControllerError, FeedForward};

fn sample_network() -> FeedForward {
    FeedForward::random(&[4, 3, 1], &mut fastrand::Rng::with_seed(3)).unwrap()
}

#[test]
fn saved_network_loads_back_identically() {
    let net = sample_network();
    let mut buf = Vec::new();
    artifact::save(&net, &mut buf).unwrap();

    let loaded = artifact::load(buf.as_slice()).unwrap();
    assert_eq!(loaded, net);
    let input = [0.1, -0.2, 0.3, -0.4];
    assert_eq!(loaded.forward(&input).unwrap(), net.forward(&input).unwrap());
}

#[test]
fn unknown_version_is_rejected() {
    let net = sample_network();
    let mut value = serde_json::to_value(&net).unwrap();
    value = serde_json::json!({ "version": ARTIFACT_VERSION + 1, "network": value });
    let err = artifact::load(value.to_string().as_bytes()).unwrap_err();
    assert!(matches!(err, ControllerError::UnsupportedVersion(v) if v == ARTIFACT_VERSION + 1));
}

#[test]
fn inconsistent_shapes_are_rejected_on_load() {
    let doc = serde_json::json!({
        "version": ARTIFACT_VERSION,
        "network": { "layers": [
            { "weights": [1.0, 2.0], "bias": [0.0], "in_dim": 4, "out_dim": 1 }
        ]}
    });
    let err = artifact::load(doc.to_string().as_bytes()).unwrap_err();
    assert!(matches!(err, ControllerError::Shape(_)));
}

#[test]
fn garbage_is_an_artifact_error() {
    let err = artifact::load(&b"not json"[..]).unwrap_err();
    assert!(matches!(err, ControllerError::Artifact(_)));
}

#[test]
fn path_helpers_round_trip_through_a_file() {
    let path = std::env::temp_dir().join(format!("arena-artifact-{}.json", std::process::id()));
    let net = sample_network();
    artifact::save_to_path(&net, &path).unwrap();
    let loaded = artifact::load_from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, net);
}
