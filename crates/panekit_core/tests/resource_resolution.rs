use panekit_core::{
    downcast_resource, ConsumptionError, Consumption, ContractCheck, ContractValidator,
    FeatureDescriptor, FeatureRegistry, Provision, ResourceKey, ResourceResolver, ResourceValue,
};
use std::sync::Arc;

fn key(value: &str) -> ResourceKey {
    ResourceKey::parse(value).expect("key should parse")
}

fn labels(values: &[ResourceValue]) -> Vec<String> {
    values
        .iter()
        .map(|value| {
            downcast_resource::<String>(value)
                .expect("string payload")
                .clone()
        })
        .collect()
}

fn frozen(registry: FeatureRegistry) -> ResourceResolver {
    let mut registry = registry;
    registry.freeze();
    ResourceResolver::new(Arc::new(registry)).expect("resolver over frozen registry")
}

#[test]
fn declared_values_come_back_exactly_in_registration_order() {
    let mut registry = FeatureRegistry::new();
    registry
        .register(
            FeatureDescriptor::new("a")
                .provide(key("a.routes"), Provision::single("a-value".to_string()))
                .provide(key("a.menu"), Provision::single("a-menu".to_string())),
        )
        .expect("a registration");
    registry
        .register(
            FeatureDescriptor::new("b")
                .provide(key("b.routes"), Provision::single("b-value".to_string())),
        )
        .expect("b registration");
    registry
        .register(
            FeatureDescriptor::new("c")
                .provide(key("c.routes"), Provision::single("c-value".to_string())),
        )
        .expect("c registration");
    let resolver = frozen(registry);

    assert_eq!(
        labels(&resolver.resolve_many(&key("*.routes"))),
        vec!["a-value", "b-value", "c-value"]
    );

    let menu = resolver
        .resolve_one(&key("a.menu"))
        .expect("exact query")
        .expect("a.menu is provided");
    assert_eq!(downcast_resource::<String>(&menu).expect("label"), "a-menu");
}

#[test]
fn collection_elements_are_spliced_at_their_provider_position() {
    let mut registry = FeatureRegistry::new();
    registry
        .register(
            FeatureDescriptor::new("a")
                .provide(key("a.routes"), Provision::single("a-value".to_string())),
        )
        .expect("a registration");
    registry
        .register(FeatureDescriptor::new("b").provide(
            key("b.routes"),
            Provision::collection(vec!["b-one".to_string(), "b-two".to_string()]),
        ))
        .expect("b registration");
    registry
        .register(
            FeatureDescriptor::new("c")
                .provide(key("c.routes"), Provision::single("c-value".to_string())),
        )
        .expect("c registration");
    let resolver = frozen(registry);

    // Four elements: b's two are spliced at positions 2-3.
    assert_eq!(
        labels(&resolver.resolve_many(&key("*.routes"))),
        vec!["a-value", "b-one", "b-two", "c-value"]
    );
}

#[test]
fn nested_collections_are_not_recursively_flattened() {
    let inner: Vec<ResourceValue> = vec![panekit_core::resource("nested".to_string())];
    let mut registry = FeatureRegistry::new();
    registry
        .register(FeatureDescriptor::new("outer").provide(
            key("outer.routes"),
            Provision::collection(vec![inner]),
        ))
        .expect("outer registration");
    let resolver = frozen(registry);

    let values = resolver.resolve_many(&key("*.routes"));
    assert_eq!(values.len(), 1);
    assert!(downcast_resource::<Vec<ResourceValue>>(&values[0]).is_some());
}

#[test]
fn absent_exact_key_is_a_miss_not_an_error() {
    let resolver = frozen(FeatureRegistry::new());
    let result = resolver
        .resolve_one(&key("settings.panels"))
        .expect("absent key is not an error");
    assert!(result.is_none());
}

#[test]
fn resolve_many_is_idempotent_without_intervening_registration() {
    let mut registry = FeatureRegistry::new();
    registry
        .register(FeatureDescriptor::new("a").provide(
            key("a.routes"),
            Provision::collection(vec!["one".to_string(), "two".to_string()]),
        ))
        .expect("a registration");
    let resolver = frozen(registry);

    let first = labels(&resolver.resolve_many(&key("*.routes")));
    let second = labels(&resolver.resolve_many(&key("*.routes")));
    assert_eq!(first, second);
    assert_eq!(first, vec!["one", "two"]);
}

#[test]
fn unmet_required_consumption_names_consumer_and_pattern() {
    let mut registry = FeatureRegistry::new();
    registry
        .register(
            FeatureDescriptor::new("shell").consume(Consumption::required(key("*.panels"))),
        )
        .expect("shell registration");
    let resolver = frozen(registry);

    let err = resolver
        .check_consumptions()
        .expect_err("unmet required pattern must fail");
    assert_eq!(
        err.to_string(),
        "feature `shell` requires `*.panels` but nothing provides it"
    );
}

#[test]
fn optional_consumption_with_no_match_is_fine() {
    let mut registry = FeatureRegistry::new();
    registry
        .register(
            FeatureDescriptor::new("shell").consume(Consumption::optional(key("*.panels"))),
        )
        .expect("shell registration");
    let resolver = frozen(registry);

    resolver
        .check_consumptions()
        .expect("optional empty match should pass");
}

#[test]
fn contract_violation_reports_provider_consumer_key_and_reason() {
    let mut registry = FeatureRegistry::new();
    registry
        .register(
            FeatureDescriptor::new("codelists")
                .provide(key("codelists.panels"), Provision::single(12u64)),
        )
        .expect("codelists registration");
    registry
        .register(FeatureDescriptor::new("settings").consume(
            Consumption::required(key("*.panels")).with_validator(ContractValidator::new(
                "panel_label",
                |value| match downcast_resource::<String>(value) {
                    Some(_) => ContractCheck::Pass,
                    None => ContractCheck::Fail("panel must carry a string label".to_string()),
                },
            )),
        ))
        .expect("settings registration");
    let resolver = frozen(registry);

    let err = resolver
        .check_consumptions()
        .expect_err("invalid panel must fail the contract");
    match err {
        ConsumptionError::Contract {
            provider,
            consumer,
            key,
            validator,
            reason,
        } => {
            assert_eq!(provider, "codelists");
            assert_eq!(consumer, "settings");
            assert_eq!(key.as_str(), "codelists.panels");
            assert_eq!(validator, "panel_label");
            assert_eq!(reason, "panel must carry a string label");
        }
        other => panic!("unexpected error: {other}"),
    }
}
