//! Definition file rendering for tests.

use std::fmt::Write;

/// One definition of a definition file.
///
/// Values passed to [`name`](Self::name), [`skip`](Self::skip) and
/// [`parameter`](Self::parameter) are written verbatim as inline YAML, so
/// `"[zone, id]"` becomes a short reference and `"\"text\""` a string.
#[derive(Debug, Clone)]
pub struct ConfigYaml {
    id: String,
    api: String,
    name: Option<String>,
    template: Option<String>,
    skip: Option<String>,
    parameters: Vec<(String, String)>,
    raw_tail: Vec<String>,
}

impl ConfigYaml {
    /// A definition with a name and a `{id}.json` template.
    pub fn new(id: &str, api: &str) -> Self {
        Self {
            id: id.to_string(),
            api: api.to_string(),
            name: Some(format!("\"{id}\"")),
            template: Some(format!("{id}.json")),
            skip: None,
            parameters: Vec::new(),
            raw_tail: Vec::new(),
        }
    }

    pub fn name(mut self, value: &str) -> Self {
        self.name = Some(value.to_string());
        self
    }

    pub fn without_name(mut self) -> Self {
        self.name = None;
        self
    }

    pub fn template(mut self, path: &str) -> Self {
        self.template = Some(path.to_string());
        self
    }

    pub fn without_template(mut self) -> Self {
        self.template = None;
        self
    }

    pub fn skip(mut self, value: &str) -> Self {
        self.skip = Some(value.to_string());
        self
    }

    pub fn parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters.push((name.to_string(), value.to_string()));
        self
    }

    /// Reference another configuration's `id` with a short reference.
    pub fn reference(self, name: &str, api: &str, config_id: &str) -> Self {
        self.parameter(name, &format!("[\"{api}\", \"{config_id}\", \"id\"]"))
    }

    /// Add a `groupOverrides` entry whose override only sets parameters.
    pub fn group_override(self, group: &str, parameters: &[(&str, &str)]) -> Self {
        self.push_override("groupOverrides", "group", group, parameters)
    }

    /// Add an `environmentOverrides` entry whose override only sets parameters.
    pub fn environment_override(self, environment: &str, parameters: &[(&str, &str)]) -> Self {
        self.push_override("environmentOverrides", "environment", environment, parameters)
    }

    fn push_override(mut self, list: &str, key: &str, name: &str, parameters: &[(&str, &str)]) -> Self {
        let mut block = format!("    {list}:\n      - {key}: {name}\n        override:\n          parameters:\n");
        for (param, value) in parameters {
            let _ = writeln!(block, "            {param}: {value}");
        }
        self.raw_tail.push(block);
        self
    }

    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "  - id: {}", self.id);
        let _ = writeln!(out, "    type:\n      api: {}", self.api);
        out.push_str("    config:\n");
        if let Some(name) = &self.name {
            let _ = writeln!(out, "      name: {name}");
        }
        if let Some(template) = &self.template {
            let _ = writeln!(out, "      template: {template}");
        }
        if let Some(skip) = &self.skip {
            let _ = writeln!(out, "      skip: {skip}");
        }
        if !self.parameters.is_empty() {
            out.push_str("      parameters:\n");
            for (name, value) in &self.parameters {
                let _ = writeln!(out, "        {name}: {value}");
            }
        }
        for block in &self.raw_tail {
            out.push_str(block);
        }
    }
}

/// Render a complete definition file.
pub fn definitions_file(configs: &[ConfigYaml]) -> String {
    let mut out = String::from("configs:\n");
    for config in configs {
        config.render(&mut out);
    }
    out
}
