//! Liquid view over the JSON render context.
//!
//! `liquid::Object` is hash-backed, so a context converted with
//! `liquid::to_object` iterates mappings in arbitrary order. Sections loop
//! over `dettaglio_per_mese` and expect the months in the order the schedule
//! produced them, so the context is mirrored into an insertion-ordered tree
//! that implements liquid's view traits directly.

use indexmap::IndexMap;
use liquid::model::{
    ArrayView, DisplayCow, KString, KStringCow, ObjectRender, ObjectSource, ScalarCow, State,
    Value as LiquidValue,
};
use liquid::{ObjectView, ValueView};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone)]
pub enum TemplateValue {
    Scalar(LiquidValue),
    List(Vec<TemplateValue>),
    Map(TemplateMap),
}

/// Mapping that keeps its keys in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TemplateMap(IndexMap<String, TemplateValue>);

impl TemplateValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => TemplateValue::Scalar(LiquidValue::Nil),
            Value::Bool(flag) => TemplateValue::Scalar(LiquidValue::scalar(*flag)),
            Value::Number(number) => TemplateValue::Scalar(match number.as_i64() {
                Some(whole) => LiquidValue::scalar(whole),
                None => LiquidValue::scalar(number.as_f64().unwrap_or(f64::NAN)),
            }),
            Value::String(text) => TemplateValue::Scalar(LiquidValue::scalar(text.clone())),
            Value::Array(items) => {
                TemplateValue::List(items.iter().map(TemplateValue::from_json).collect())
            }
            Value::Object(map) => TemplateValue::Map(TemplateMap::from_json(map)),
        }
    }

    fn view(&self) -> &dyn ValueView {
        match self {
            TemplateValue::Scalar(value) => value,
            TemplateValue::List(items) => items,
            TemplateValue::Map(map) => map,
        }
    }
}

impl TemplateMap {
    pub fn from_json(map: &Map<String, Value>) -> Self {
        Self(
            map.iter()
                .map(|(key, value)| (key.clone(), TemplateValue::from_json(value)))
                .collect(),
        )
    }
}

impl ValueView for TemplateValue {
    fn as_debug(&self) -> &dyn fmt::Debug {
        self
    }

    fn render(&self) -> DisplayCow<'_> {
        self.view().render()
    }
    fn source(&self) -> DisplayCow<'_> {
        self.view().source()
    }
    fn type_name(&self) -> &'static str {
        self.view().type_name()
    }
    fn query_state(&self, state: State) -> bool {
        self.view().query_state(state)
    }

    fn to_kstr(&self) -> KStringCow<'_> {
        self.view().to_kstr()
    }
    fn to_value(&self) -> LiquidValue {
        self.view().to_value()
    }

    fn as_scalar(&self) -> Option<ScalarCow<'_>> {
        self.view().as_scalar()
    }
    fn as_array(&self) -> Option<&dyn ArrayView> {
        self.view().as_array()
    }
    fn as_object(&self) -> Option<&dyn ObjectView> {
        self.view().as_object()
    }
    fn as_state(&self) -> Option<State> {
        self.view().as_state()
    }
    fn is_nil(&self) -> bool {
        self.view().is_nil()
    }
}

impl ValueView for TemplateMap {
    fn as_debug(&self) -> &dyn fmt::Debug {
        self
    }

    fn render(&self) -> DisplayCow<'_> {
        DisplayCow::Owned(Box::new(ObjectRender::new(self)))
    }
    fn source(&self) -> DisplayCow<'_> {
        DisplayCow::Owned(Box::new(ObjectSource::new(self)))
    }
    fn type_name(&self) -> &'static str {
        "object"
    }
    fn query_state(&self, state: State) -> bool {
        match state {
            State::Truthy => true,
            State::DefaultValue | State::Empty | State::Blank => self.0.is_empty(),
        }
    }

    fn to_kstr(&self) -> KStringCow<'_> {
        KStringCow::from_string(ObjectRender::new(self).to_string())
    }
    fn to_value(&self) -> LiquidValue {
        LiquidValue::Object(
            self.0
                .iter()
                .map(|(key, value)| (KString::from_ref(key), value.to_value()))
                .collect(),
        )
    }

    fn as_object(&self) -> Option<&dyn ObjectView> {
        Some(self)
    }
}

impl ObjectView for TemplateMap {
    fn as_value(&self) -> &dyn ValueView {
        self
    }

    fn size(&self) -> i64 {
        self.0.len() as i64
    }

    fn keys<'k>(&'k self) -> Box<dyn Iterator<Item = KStringCow<'k>> + 'k> {
        Box::new(self.0.keys().map(|key| KStringCow::from(key.as_str())))
    }

    fn values<'k>(&'k self) -> Box<dyn Iterator<Item = &'k dyn ValueView> + 'k> {
        Box::new(self.0.values().map(|value| value as &dyn ValueView))
    }

    fn iter<'k>(&'k self) -> Box<dyn Iterator<Item = (KStringCow<'k>, &'k dyn ValueView)> + 'k> {
        Box::new(
            self.0
                .iter()
                .map(|(key, value)| (KStringCow::from(key.as_str()), value as &dyn ValueView)),
        )
    }

    fn contains_key(&self, index: &str) -> bool {
        self.0.contains_key(index)
    }

    fn get<'s>(&'s self, index: &str) -> Option<&'s dyn ValueView> {
        self.0.get(index).map(|value| value as &dyn ValueView)
    }
}
