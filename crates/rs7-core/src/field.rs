//! HL7 field, component, and subcomponent structures

use crate::encoding::Encoding;
use crate::delimiters::Delimiters;
use crate::error::Result;

/// A subcomponent within a component
///
/// This is the smallest unit in HL7 message hierarchy.
/// Example: In "Smith&John", "Smith" and "John" are subcomponents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubComponent {
    pub value: String,
}

impl SubComponent {
    /// Create a new subcomponent
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Check if subcomponent is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get the raw value
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Encode the subcomponent value
    pub fn encode(&self, delimiters: &Delimiters) -> String {
        Encoding::encode(&self.value, delimiters)
    }

    /// Decode from string
    pub fn decode(value: &str, delimiters: &Delimiters) -> Result<Self> {
        Ok(Self {
            value: Encoding::decode(value, delimiters)?,
        })
    }
}

impl From<String> for SubComponent {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SubComponent {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A component within a field
///
/// Components can contain subcomponents separated by the subcomponent separator (&).
/// Example: In "Smith&John^MD", "Smith&John" is a component with two subcomponents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub subcomponents: Vec<SubComponent>,
}

impl Component {
    /// Create a new component
    pub fn new() -> Self {
        Self {
            subcomponents: Vec::new(),
        }
    }

    /// Create a component from a single value
    pub fn from_value<S: Into<String>>(value: S) -> Self {
        Self {
            subcomponents: vec![SubComponent::new(value)],
        }
    }

    /// Add a subcomponent
    pub fn add_subcomponent(&mut self, subcomponent: SubComponent) {
        self.subcomponents.push(subcomponent);
    }

    /// Get a subcomponent by index (0-based)
    pub fn get_subcomponent(&self, index: usize) -> Option<&SubComponent> {
        self.subcomponents.get(index)
    }

    /// Get a mutable subcomponent by index (0-based)
    pub fn get_subcomponent_mut(&mut self, index: usize) -> Option<&mut SubComponent> {
        self.subcomponents.get_mut(index)
    }

    /// Check if component is empty
    pub fn is_empty(&self) -> bool {
        self.subcomponents.is_empty() || self.subcomponents.iter().all(|s| s.is_empty())
    }

    /// Get the first subcomponent value (most common case)
    pub fn value(&self) -> Option<&str> {
        self.subcomponents.first().map(|s| s.as_str())
    }

    /// Encode the component, escaping any literal delimiter bytes in each subcomponent
    pub fn encode(&self, delimiters: &Delimiters) -> String {
        self.encode_opts(delimiters, true)
    }

    /// Encode the component, optionally eliding trailing empty subcomponents
    pub fn encode_opts(&self, delimiters: &Delimiters, trailing_delimiters: bool) -> String {
        let mut subs = self.subcomponents.as_slice();
        if !trailing_delimiters {
            while subs.len() > 1 && subs.last().is_some_and(|s| s.is_empty()) {
                subs = &subs[..subs.len() - 1];
            }
        }
        subs.iter()
            .map(|sc| sc.encode(delimiters))
            .collect::<Vec<_>>()
            .join(&delimiters.subcomponent_separator.to_string())
    }

    /// Join decoded subcomponent text with the subcomponent separator, without
    /// wire escaping. Used by the path accessor to return "the whole of what
    /// remains" when a path stops short of a leaf.
    pub fn joined(&self, delimiters: &Delimiters) -> String {
        self.subcomponents
            .iter()
            .map(|sc| sc.as_str())
            .collect::<Vec<_>>()
            .join(&delimiters.subcomponent_separator.to_string())
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}

/// A repetition of a field
///
/// Fields can repeat, with each repetition containing components.
/// Example: In "Value1~Value2~Value3", there are 3 repetitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    pub components: Vec<Component>,
}

impl Repetition {
    /// Create a new repetition
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Create from a single value
    pub fn from_value<S: Into<String>>(value: S) -> Self {
        Self {
            components: vec![Component::from_value(value)],
        }
    }

    /// Add a component
    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Get a component by index (0-based)
    pub fn get_component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    /// Get a mutable component by index (0-based)
    pub fn get_component_mut(&mut self, index: usize) -> Option<&mut Component> {
        self.components.get_mut(index)
    }

    /// Check if repetition is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() || self.components.iter().all(|c| c.is_empty())
    }

    /// Get the first component's value (most common case)
    pub fn value(&self) -> Option<&str> {
        self.components.first().and_then(|c| c.value())
    }

    /// Encode the repetition
    pub fn encode(&self, delimiters: &Delimiters) -> String {
        self.encode_opts(delimiters, true)
    }

    /// Encode the repetition, optionally eliding trailing empty components
    pub fn encode_opts(&self, delimiters: &Delimiters, trailing_delimiters: bool) -> String {
        let mut comps = self.components.as_slice();
        if !trailing_delimiters {
            while comps.len() > 1 && comps.last().is_some_and(|c| c.is_empty()) {
                comps = &comps[..comps.len() - 1];
            }
        }
        comps
            .iter()
            .map(|c| c.encode_opts(delimiters, trailing_delimiters))
            .collect::<Vec<_>>()
            .join(&delimiters.component_separator.to_string())
    }

    /// Join decoded component text with the component separator, without wire
    /// escaping. Used by the path accessor's "whole of what remains" rule.
    pub fn joined(&self, delimiters: &Delimiters) -> String {
        self.components
            .iter()
            .map(|c| c.joined(delimiters))
            .collect::<Vec<_>>()
            .join(&delimiters.component_separator.to_string())
    }
}

impl Default for Repetition {
    fn default() -> Self {
        Self::new()
    }
}

/// A field within a segment
///
/// Fields can contain multiple repetitions, each with components and subcomponents.
/// The hierarchy is: Field -> Repetitions -> Components -> Subcomponents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub repetitions: Vec<Repetition>,
}

impl Field {
    /// Create a new empty field
    pub fn new() -> Self {
        Self {
            repetitions: Vec::new(),
        }
    }

    /// Create from a single value
    pub fn from_value<S: Into<String>>(value: S) -> Self {
        Self {
            repetitions: vec![Repetition::from_value(value)],
        }
    }

    /// Add a repetition
    pub fn add_repetition(&mut self, repetition: Repetition) {
        self.repetitions.push(repetition);
    }

    /// Get a repetition by index (0-based)
    pub fn get_repetition(&self, index: usize) -> Option<&Repetition> {
        self.repetitions.get(index)
    }

    /// Get a mutable repetition by index (0-based)
    pub fn get_repetition_mut(&mut self, index: usize) -> Option<&mut Repetition> {
        self.repetitions.get_mut(index)
    }

    /// Check if field is empty
    pub fn is_empty(&self) -> bool {
        self.repetitions.is_empty() || self.repetitions.iter().all(|r| r.is_empty())
    }

    /// Get the first repetition's value (most common case)
    pub fn value(&self) -> Option<&str> {
        self.repetitions.first().and_then(|r| r.value())
    }

    /// Encode the field
    pub fn encode(&self, delimiters: &Delimiters) -> String {
        self.encode_opts(delimiters, true)
    }

    /// Encode the field, optionally eliding trailing empty repetitions
    pub fn encode_opts(&self, delimiters: &Delimiters, trailing_delimiters: bool) -> String {
        let mut reps = self.repetitions.as_slice();
        if !trailing_delimiters {
            while reps.len() > 1 && reps.last().is_some_and(|r| r.is_empty()) {
                reps = &reps[..reps.len() - 1];
            }
        }
        reps.iter()
            .map(|r| r.encode_opts(delimiters, trailing_delimiters))
            .collect::<Vec<_>>()
            .join(&delimiters.repetition_separator.to_string())
    }

    /// Get component at path (e.g., \[0\]\[2\] for first repetition, third component)
    pub fn get_component(&self, rep_index: usize, comp_index: usize) -> Option<&Component> {
        self.get_repetition(rep_index)
            .and_then(|r| r.get_component(comp_index))
    }

    /// Get subcomponent at path
    pub fn get_subcomponent(
        &self,
        rep_index: usize,
        comp_index: usize,
        sub_index: usize,
    ) -> Option<&SubComponent> {
        self.get_component(rep_index, comp_index)
            .and_then(|c| c.get_subcomponent(sub_index))
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}
