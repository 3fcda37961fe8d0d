//! Scripted structured model for pipeline tests
//!
//! Answers layout prompts and critique prompts with canned JSON and counts
//! how often each was asked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use serde_json::{json, Value};
use banner_buddy::services::{ImagePart, StructuredModel};
use banner_buddy::utils::errors::{ModelError, ModelResult};

/// Canned answer for one kind of prompt
#[derive(Debug, Clone)]
pub enum Canned {
    Json(Value),
    Fail,
}

impl Canned {
    fn answer(&self) -> ModelResult<Value> {
        match self {
            Canned::Json(value) => Ok(value.clone()),
            Canned::Fail => Err(ModelError::ServiceUnavailable),
        }
    }
}

pub fn sample_layout() -> Value {
    json!({
        "text_placement": {"x": 30, "y": 25},
        "text_color": "#FFFF00",
        "logo_placement": {"x": 780, "y": 20}
    })
}

pub fn legible() -> Value {
    json!({"is_legible": true, "critique": "Clear white text on a dark area."})
}

pub fn not_legible() -> Value {
    json!({"is_legible": false, "critique": "The description blends into the background."})
}

/// Fake model distinguishing layout and critique prompts by their wording
pub struct FakeModel {
    layout: Mutex<Canned>,
    critique: Mutex<Canned>,
    layout_calls: AtomicUsize,
    critique_calls: AtomicUsize,
}

impl FakeModel {
    pub fn new(layout: Canned, critique: Canned) -> Arc<Self> {
        Arc::new(Self {
            layout: Mutex::new(layout),
            critique: Mutex::new(critique),
            layout_calls: AtomicUsize::new(0),
            critique_calls: AtomicUsize::new(0),
        })
    }

    /// Model that always produces a layout and a passing critique
    pub fn happy() -> Arc<Self> {
        Self::new(Canned::Json(sample_layout()), Canned::Json(legible()))
    }

    pub fn set_layout(&self, canned: Canned) {
        *self.layout.lock().unwrap() = canned;
    }

    pub fn set_critique(&self, canned: Canned) {
        *self.critique.lock().unwrap() = canned;
    }

    pub fn layout_calls(&self) -> usize {
        self.layout_calls.load(Ordering::SeqCst)
    }

    pub fn critique_calls(&self) -> usize {
        self.critique_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StructuredModel for FakeModel {
    async fn generate_json(&self, prompt: &str, image: Option<ImagePart>) -> ModelResult<Value> {
        assert!(image.is_some(), "pipeline calls always attach an image");

        if prompt.contains("Critique this banner") {
            self.critique_calls.fetch_add(1, Ordering::SeqCst);
            self.critique.lock().unwrap().answer()
        } else {
            self.layout_calls.fetch_add(1, Ordering::SeqCst);
            self.layout.lock().unwrap().answer()
        }
    }
}
