//! Override precedence properties

use std::collections::BTreeMap;

use cascade_core::definition::{EnvironmentOverride, GroupOverride, TypeDefinition};
use cascade_core::{ConfigBody, ConfigDefinition, OverrideIndex, ParameterBlock, RawParameter};
use cascade_meta::EnvironmentDefinition;
use proptest::prelude::*;
use serde_yaml::Value;

fn parameters() -> impl Strategy<Value = BTreeMap<String, i64>> {
    proptest::collection::btree_map("[a-e]", any::<i64>(), 0..5)
}

fn body(template: Option<String>, parameters: &BTreeMap<String, i64>) -> ConfigBody {
    ConfigBody {
        name: None,
        template,
        skip: None,
        parameters: parameters
            .iter()
            .map(|(k, v)| (k.clone(), RawParameter::Literal(Value::from(*v))))
            .collect::<ParameterBlock>(),
    }
}

proptest! {
    #[test]
    fn merged_parameters_follow_precedence(
        base in parameters(),
        group in parameters(),
        environment in parameters(),
        base_template in proptest::option::of("[a-z]{1,8}"),
        group_template in proptest::option::of("[a-z]{0,8}"),
        group_matches in any::<bool>(),
        environment_matches in any::<bool>(),
    ) {
        let definition = ConfigDefinition {
            id: "c".into(),
            kind: TypeDefinition { api: "api".into() },
            config: body(base_template.clone(), &base),
            group_overrides: vec![GroupOverride {
                group: if group_matches { "g".into() } else { "other".into() },
                body: body(group_template.clone(), &group),
            }],
            environment_overrides: vec![EnvironmentOverride {
                environment: if environment_matches { "e".into() } else { "other".into() },
                body: body(None, &environment),
            }],
        };

        let index = OverrideIndex::new(&definition);
        let merged = index.merge(&definition.config, &EnvironmentDefinition::new("e", "g"));

        let mut expected = base.clone();
        let mut expected_template = base_template.clone();
        if group_matches {
            expected.extend(group.clone());
            if let Some(t) = group_template.filter(|t| !t.is_empty()) {
                expected_template = Some(t);
            }
        }
        if environment_matches {
            expected.extend(environment.clone());
        }

        let actual: BTreeMap<String, i64> = merged
            .parameters
            .iter()
            .map(|(k, v)| match v {
                RawParameter::Literal(Value::Number(n)) => (k.clone(), n.as_i64().unwrap()),
                other => panic!("unexpected {other:?}"),
            })
            .collect();

        prop_assert_eq!(actual, expected);
        prop_assert_eq!(merged.template, expected_template);
        prop_assert!(merged.duplicates.is_empty());
    }
}
