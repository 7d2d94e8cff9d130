/*!
 * Semantics builder.
 *
 * Maps utterances such as "open the blinds" to directives (action mappings)
 * and reported values to utterances such as "are the blinds closed" (state
 * mappings). Entries sharing an identical directive, value or range are
 * grouped into one mapping.
 */
use serde_json::{json, Value};
use tracing::debug;

/// Supported semantic actions
pub const ACTIONS: &[&str] = &["Close", "Open", "Lower", "Raise"];

/// Supported semantic states
pub const STATES: &[&str] = &["Closed", "Open"];

/// Check if a name is a supported semantic action
pub fn is_action(name: &str) -> bool {
    ACTIONS.contains(&name)
}

/// Check if a name is a supported semantic state
pub fn is_state(name: &str) -> bool {
    STATES.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
enum StateTarget {
    Value(Value),
    Range { minimum: f64, maximum: f64 },
}

/// Builder of capability semantics
#[derive(Debug, Clone, Default)]
pub struct Semantics {
    actions: Vec<(Vec<String>, Value)>,
    states: Vec<(Vec<String>, StateTarget)>,
}

impl Semantics {
    /// Create an empty semantics builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an action to a directive
    ///
    /// # Arguments
    ///
    /// * `action` - The semantic action (e.g. "Close")
    /// * `name` - The directive name
    /// * `payload` - The directive payload
    pub fn add_action_to_directive(&mut self, action: &str, name: &str, payload: Value) {
        if !is_action(action) {
            debug!("Ignoring unsupported semantic action {}", action);
            return;
        }

        let action = format!("Alexa.Actions.{}", action);
        let directive = json!({ "name": name, "payload": payload });

        match self.actions.iter_mut().find(|(_, d)| *d == directive) {
            Some((actions, _)) => {
                if !actions.contains(&action) {
                    actions.push(action);
                }
            }
            None => self.actions.push((vec![action], directive)),
        }
    }

    /// Map a state to a single value
    pub fn add_state_to_value(&mut self, state: &str, value: Value) {
        self.add_state(state, StateTarget::Value(value));
    }

    /// Map a state to a value range
    pub fn add_state_to_range(&mut self, state: &str, minimum: f64, maximum: f64) {
        self.add_state(state, StateTarget::Range { minimum, maximum });
    }

    fn add_state(&mut self, state: &str, target: StateTarget) {
        if !is_state(state) {
            debug!("Ignoring unsupported semantic state {}", state);
            return;
        }

        let state = format!("Alexa.States.{}", state);

        match self.states.iter_mut().find(|(_, t)| *t == target) {
            Some((states, _)) => {
                if !states.contains(&state) {
                    states.push(state);
                }
            }
            None => self.states.push((vec![state], target)),
        }
    }

    /// Check if no mapping was added
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.states.is_empty()
    }

    /// Convert to the discovery representation
    ///
    /// # Returns
    ///
    /// The semantics block, or `None` when there is no mapping
    pub fn to_json(&self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }

        let mut semantics = serde_json::Map::new();

        if !self.actions.is_empty() {
            let mappings: Vec<Value> = self
                .actions
                .iter()
                .map(|(actions, directive)| {
                    json!({"@type": "ActionsToDirective", "actions": actions, "directive": directive})
                })
                .collect();
            semantics.insert("actionMappings".to_string(), Value::from(mappings));
        }

        if !self.states.is_empty() {
            let mappings: Vec<Value> = self
                .states
                .iter()
                .map(|(states, target)| match target {
                    StateTarget::Value(value) => {
                        json!({"@type": "StatesToValue", "states": states, "value": value})
                    }
                    StateTarget::Range { minimum, maximum } => json!({
                        "@type": "StatesToRange",
                        "states": states,
                        "range": {"minimumValue": minimum, "maximumValue": maximum}
                    }),
                })
                .collect();
            semantics.insert("stateMappings".to_string(), Value::from(mappings));
        }

        Some(Value::Object(semantics))
    }
}
