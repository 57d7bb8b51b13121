use panekit_core::{derive_sub_resource, BackendApi, BackendError, BackendResult, ScopedBackend};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[test]
fn sub_resource_paths_compose_with_one_separator() {
    assert_eq!(derive_sub_resource("admin", "modules"), "admin/modules/");
    assert_eq!(derive_sub_resource("admin/", "/modules"), "admin/modules/");
    assert_eq!(derive_sub_resource("admin", ""), "admin");
}

#[derive(Default)]
struct FakeBackend {
    addresses: Mutex<Vec<String>>,
}

impl BackendApi for FakeBackend {
    fn get(&self, path: &str) -> BackendResult<Value> {
        self.addresses
            .lock()
            .expect("address mutex")
            .push(path.to_string());
        Ok(json!({"ok": true}))
    }

    fn post(&self, path: &str, _body: Value) -> BackendResult<Value> {
        self.addresses
            .lock()
            .expect("address mutex")
            .push(path.to_string());
        Ok(Value::Null)
    }

    fn patch(&self, _path: &str, _body: Value) -> BackendResult<Value> {
        Ok(Value::Null)
    }

    fn delete(&self, path: &str) -> BackendResult<Value> {
        Err(BackendError::new(path, "forbidden", "read-only backend"))
    }
}

#[test]
fn derived_scopes_chain_and_address_under_the_base() {
    let backend = Arc::new(FakeBackend::default());
    let admin = ScopedBackend::new(Arc::clone(&backend) as Arc<dyn BackendApi>, "admin");
    let settings = admin.sub("modules").sub("settings");
    assert_eq!(settings.base(), "admin/modules/settings/");

    settings.get("theme").expect("get should succeed");
    settings
        .post("theme", json!({"value": "dark"}))
        .expect("post should succeed");

    assert_eq!(
        *backend.addresses.lock().expect("address mutex"),
        vec![
            "admin/modules/settings/theme".to_string(),
            "admin/modules/settings/theme".to_string(),
        ]
    );
}

#[test]
fn transport_errors_surface_the_full_address() {
    let backend = Arc::new(FakeBackend::default());
    let modules = ScopedBackend::new(backend, "admin").sub("modules");
    let err = modules
        .delete("codelists")
        .expect_err("delete should fail on the read-only backend");
    assert_eq!(err.address, "admin/modules/codelists");
    assert_eq!(err.code, "forbidden");
}
