use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
    error::{Result, agent_error::AgentError},
    input::{Desktop, MouseButton, ScrollAxis, Screenshot, Target},
};

/// The closed set of primitives the oracle may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Move,
    Click,
    DoubleClick,
    Drag,
    Scroll,
    PressKey,
    KeyCombination,
    TypeString,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Move,
        ToolKind::Click,
        ToolKind::DoubleClick,
        ToolKind::Drag,
        ToolKind::Scroll,
        ToolKind::PressKey,
        ToolKind::KeyCombination,
        ToolKind::TypeString,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Move => "move",
            ToolKind::Click => "click",
            ToolKind::DoubleClick => "double_click",
            ToolKind::Drag => "drag",
            ToolKind::Scroll => "scroll",
            ToolKind::PressKey => "press_key",
            ToolKind::KeyCombination => "key_combination",
            ToolKind::TypeString => "type_string",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::Move => "Move the mouse pointer to a position on the screen.",
            ToolKind::Click => "Move the pointer to a position and click a mouse button once.",
            ToolKind::DoubleClick => "Move the pointer to a position and click a mouse button twice.",
            ToolKind::Drag => {
                "Press the left button at the initial position, move to the final position and release."
            }
            ToolKind::Scroll => {
                "Scroll the wheel. Negative vertical deltas scroll down, positive deltas scroll up."
            }
            ToolKind::PressKey => "Press and release a single key, e.g. `enter`, `a`, `f5`, `!`.",
            ToolKind::KeyCombination => {
                "Hold the listed keys down in order, then release them in reverse, e.g. [\"ctrl\", \"c\"]."
            }
            ToolKind::TypeString => "Type a string of text character by character.",
        }
    }

    /// Argument schema; `element` parameters only appear when a grounder can resolve them.
    pub fn params_schema(self, grounding: bool) -> Value {
        match self {
            ToolKind::Move => point_schema(grounding, None),
            ToolKind::Click | ToolKind::DoubleClick => point_schema(
                grounding,
                Some(json!({
                    "type": "string",
                    "enum": ["left", "right", "middle"],
                    "default": "left",
                })),
            ),
            ToolKind::Drag => {
                let position = if grounding {
                    json!({
                        "description": "[x, y] in pixels, or a description of the on-screen element",
                        "oneOf": [
                            { "type": "array", "items": { "type": "integer" }, "minItems": 2, "maxItems": 2 },
                            { "type": "string" },
                        ],
                    })
                } else {
                    json!({
                        "description": "[x, y] in pixels",
                        "type": "array",
                        "items": { "type": "integer" },
                        "minItems": 2,
                        "maxItems": 2,
                    })
                };
                json!({
                    "type": "object",
                    "properties": { "initial_pos": position, "final_pos": position },
                    "required": ["initial_pos", "final_pos"],
                })
            }
            ToolKind::Scroll => json!({
                "type": "object",
                "properties": {
                    "direction": { "type": "string", "enum": ["vertical", "horizontal"] },
                    "delta": { "type": "integer" },
                },
                "required": ["direction", "delta"],
            }),
            ToolKind::PressKey => json!({
                "type": "object",
                "properties": { "key": { "type": "string" } },
                "required": ["key"],
            }),
            ToolKind::KeyCombination => json!({
                "type": "object",
                "properties": { "keys": { "type": "array", "items": { "type": "string" } } },
                "required": ["keys"],
            }),
            ToolKind::TypeString => json!({
                "type": "object",
                "properties": { "string": { "type": "string" } },
                "required": ["string"],
            }),
        }
    }
}

fn point_schema(grounding: bool, button: Option<Value>) -> Value {
    let mut properties = json!({
        "x": { "type": "integer", "description": "pixels from the left edge" },
        "y": { "type": "integer", "description": "pixels from the top edge" },
    });
    if grounding {
        properties["element"] = json!({
            "type": "string",
            "description": "description of the on-screen element, used instead of x/y",
        });
    }
    if let Some(button) = button {
        properties["button"] = button;
    }
    json!({ "type": "object", "properties": properties })
}

#[derive(Debug, Deserialize)]
struct PointArgs {
    x: Option<i32>,
    y: Option<i32>,
    element: Option<String>,
}

impl PointArgs {
    fn into_target(self, tool: &str) -> Result<Target> {
        match (self.x, self.y, self.element) {
            (Some(x), Some(y), _) => Ok(Target::pixel(x, y)),
            (_, _, Some(element)) if !element.trim().is_empty() => Ok(Target::Element(element)),
            _ => Err(AgentError::invalid_arguments(tool, "expected `x` and `y` or `element`").into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClickArgs {
    #[serde(default)]
    button: MouseButton,
    #[serde(flatten)]
    point: PointArgs,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetValue {
    Pixel([i32; 2]),
    Element(String),
}

impl From<TargetValue> for Target {
    fn from(value: TargetValue) -> Self {
        match value {
            TargetValue::Pixel([x, y]) => Target::pixel(x, y),
            TargetValue::Element(element) => Target::Element(element),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DragArgs {
    initial_pos: TargetValue,
    final_pos: TargetValue,
}

#[derive(Debug, Deserialize)]
struct ScrollArgs {
    direction: ScrollAxis,
    delta: i32,
}

#[derive(Debug, Deserialize)]
struct PressKeyArgs {
    key: String,
}

#[derive(Debug, Deserialize)]
struct KeyCombinationArgs {
    keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TypeStringArgs {
    #[serde(alias = "text")]
    string: String,
}

/// A validated tool call, ready to run against the desktop.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    Move(Target),
    Click(MouseButton, Target),
    DoubleClick(MouseButton, Target),
    Drag { from: Target, to: Target },
    Scroll { axis: ScrollAxis, delta: i32 },
    PressKey(String),
    KeyCombination(Vec<String>),
    TypeString(String),
}

fn args<T: DeserializeOwned>(kind: ToolKind, arguments: &Value) -> Result<T> {
    // some models send the arguments object as a JSON string
    let decoded = match arguments {
        Value::String(raw) => serde_json::from_str(raw),
        Value::Null => serde_json::from_value(json!({})),
        other => serde_json::from_value(other.clone()),
    };
    decoded.map_err(|e| AgentError::invalid_arguments(kind.name(), e).into())
}

impl ToolAction {
    pub fn parse(kind: ToolKind, arguments: &Value) -> Result<Self> {
        let action = match kind {
            ToolKind::Move => ToolAction::Move(args::<PointArgs>(kind, arguments)?.into_target(kind.name())?),
            ToolKind::Click => {
                let a: ClickArgs = args(kind, arguments)?;
                ToolAction::Click(a.button, a.point.into_target(kind.name())?)
            }
            ToolKind::DoubleClick => {
                let a: ClickArgs = args(kind, arguments)?;
                ToolAction::DoubleClick(a.button, a.point.into_target(kind.name())?)
            }
            ToolKind::Drag => {
                let a: DragArgs = args(kind, arguments)?;
                ToolAction::Drag {
                    from: a.initial_pos.into(),
                    to: a.final_pos.into(),
                }
            }
            ToolKind::Scroll => {
                let a: ScrollArgs = args(kind, arguments)?;
                ToolAction::Scroll {
                    axis: a.direction,
                    delta: a.delta,
                }
            }
            ToolKind::PressKey => ToolAction::PressKey(args::<PressKeyArgs>(kind, arguments)?.key),
            ToolKind::KeyCombination => {
                let a: KeyCombinationArgs = args(kind, arguments)?;
                if a.keys.is_empty() {
                    return Err(AgentError::invalid_arguments(kind.name(), "`keys` is empty").into());
                }
                ToolAction::KeyCombination(a.keys)
            }
            ToolKind::TypeString => ToolAction::TypeString(args::<TypeStringArgs>(kind, arguments)?.string),
        };
        Ok(action)
    }

    pub async fn perform(&self, desktop: &mut Desktop) -> Result<Screenshot> {
        match self {
            ToolAction::Move(target) => desktop.move_to(target).await,
            ToolAction::Click(button, target) => desktop.click(*button, target).await,
            ToolAction::DoubleClick(button, target) => desktop.double_click(*button, target).await,
            ToolAction::Drag { from, to } => desktop.drag(from, to).await,
            ToolAction::Scroll { axis, delta } => desktop.scroll(*axis, *delta),
            ToolAction::PressKey(key) => desktop.press_key(key),
            ToolAction::KeyCombination(keys) => desktop.key_combination(keys.as_slice()),
            ToolAction::TypeString(text) => desktop.type_string(text),
        }
    }

    /// Short text returned to the oracle alongside the screenshot.
    pub fn describe(&self) -> String {
        match self {
            ToolAction::Move(target) => format!("moved pointer to {}", describe_target(target)),
            ToolAction::Click(button, target) => {
                format!("{} click at {}", button_name(*button), describe_target(target))
            }
            ToolAction::DoubleClick(button, target) => {
                format!("{} double click at {}", button_name(*button), describe_target(target))
            }
            ToolAction::Drag { from, to } => {
                format!("dragged from {} to {}", describe_target(from), describe_target(to))
            }
            ToolAction::Scroll { axis, delta } => {
                let axis = match axis {
                    ScrollAxis::Vertical => "vertical",
                    ScrollAxis::Horizontal => "horizontal",
                };
                format!("scrolled {axis} by {delta}")
            }
            ToolAction::PressKey(key) => format!("pressed {key}"),
            ToolAction::KeyCombination(keys) => format!("pressed {}", keys.join("+")),
            ToolAction::TypeString(text) => format!("typed {text:?}"),
        }
    }
}

fn button_name(button: MouseButton) -> &'static str {
    match button {
        MouseButton::Left => "left",
        MouseButton::Right => "right",
        MouseButton::Middle => "middle",
    }
}

fn describe_target(target: &Target) -> String {
    match target {
        Target::Pixel(point) => format!("({}, {})", point.x, point.y),
        Target::Element(element) => format!("{element:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_defaults_to_left_button() {
        let action = ToolAction::parse(ToolKind::Click, &json!({"x": 10, "y": 20})).unwrap();
        assert_eq!(action, ToolAction::Click(MouseButton::Left, Target::pixel(10, 20)));
    }

    #[test]
    fn element_reference_is_accepted() {
        let action = ToolAction::parse(
            ToolKind::DoubleClick,
            &json!({"button": "right", "element": "the recycle bin"}),
        )
        .unwrap();
        assert_eq!(
            action,
            ToolAction::DoubleClick(MouseButton::Right, Target::Element("the recycle bin".into()))
        );
    }

    #[test]
    fn drag_mixes_pixels_and_elements() {
        let action = ToolAction::parse(
            ToolKind::Drag,
            &json!({"initial_pos": [1, 2], "final_pos": "the trash icon"}),
        )
        .unwrap();
        assert_eq!(
            action,
            ToolAction::Drag {
                from: Target::pixel(1, 2),
                to: Target::Element("the trash icon".into()),
            }
        );
    }

    #[test]
    fn stringified_arguments_are_decoded() {
        let action = ToolAction::parse(ToolKind::TypeString, &json!("{\"text\": \"hi\"}")).unwrap();
        assert_eq!(action, ToolAction::TypeString("hi".into()));
    }

    #[test]
    fn missing_coordinates_are_invalid() {
        let err = ToolAction::parse(ToolKind::Move, &json!({"x": 3})).unwrap_err();
        assert!(err.to_string().contains("move"));
        assert!(ToolAction::parse(ToolKind::KeyCombination, &json!({"keys": []})).is_err());
    }

    #[test]
    fn element_is_only_declared_with_grounding() {
        let plain = ToolKind::Click.params_schema(false);
        let grounded = ToolKind::Click.params_schema(true);
        assert!(plain["properties"].get("element").is_none());
        assert!(grounded["properties"].get("element").is_some());
    }
}
