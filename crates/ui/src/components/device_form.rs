//! # Device Form
//!
//! Shown while a placement position is pending. Submitting hands a
//! [`DeviceDraft`] to the session, which validates it, creates the device at
//! the pending position and reloads the diagram.

use dioxus::prelude::*;
use plano_core::{DeviceStatus, DeviceType, EditorError, EditorResult};
use plano_editor::Intent;
use plano_model::{CREATABLE_DEVICE_TYPES, DeviceDraft, PcAttributes};

use crate::components::inputs::{Select, SelectOption, TextInput};
use crate::runner::dispatch;
use crate::state::APP_STATE;

// ============================================================================
// Form Values
// ============================================================================

/// Raw text of every form field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceFormValues {
    pub name: String,
    pub device_type: String,
    pub ip: String,
    pub status: String,
    pub user: String,
    pub place_name: String,
    pub description: String,
    pub cpu: String,
    pub cpu_benchmark: String,
    pub ram: String,
    pub ram_ddr: String,
    pub motherboard: String,
    pub disks: String,
    pub gpu: String,
    pub gpu_memory: String,
    pub office: String,
    pub antivirus: String,
}

impl DeviceFormValues {
    pub fn new() -> Self {
        Self {
            device_type: DeviceType::Pc.as_str().to_string(),
            status: DeviceStatus::Unknown.as_str().to_string(),
            ..Default::default()
        }
    }

    /// Build the draft handed to the session
    ///
    /// Only form-level parsing happens here; the session validates the
    /// result before anything is sent.
    pub fn to_draft(&self) -> EditorResult<DeviceDraft> {
        let device_type = DeviceType::from(self.device_type.as_str());
        let mut draft = DeviceDraft {
            ip: self.ip.trim().to_string(),
            status: DeviceStatus::from(self.status.as_str()),
            user: optional(&self.user),
            description: optional(&self.description),
            place_name: optional(&self.place_name),
            ..DeviceDraft::new(self.name.trim(), device_type.clone())
        };

        if device_type == DeviceType::Pc {
            draft = draft.with_pc(self.pc_attributes()?);
        }
        Ok(draft)
    }

    /// Hand the draft to `submit` and clear the fields once it is accepted
    ///
    /// `submit` returns whether the draft was taken. A rejected draft keeps
    /// the typed values for correction.
    pub fn submit_with(&mut self, submit: impl FnOnce(DeviceDraft) -> bool) -> EditorResult<()> {
        let draft = self.to_draft()?;
        if submit(draft) {
            *self = Self::new();
        }
        Ok(())
    }

    fn pc_attributes(&self) -> EditorResult<PcAttributes> {
        let ram = match self.ram.trim() {
            "" => None,
            text => Some(text.parse::<i64>().map_err(|_| {
                EditorError::validation(format!("RAM must be a whole number of GB, got '{}'", text))
            })?),
        };

        Ok(PcAttributes {
            user: optional(&self.user),
            cpu_benchmark: optional(&self.cpu_benchmark),
            cpu: optional(&self.cpu),
            ram,
            office: optional(&self.office),
            antivirus: optional(&self.antivirus),
            motherboard: optional(&self.motherboard),
            disks: optional(&self.disks),
            ram_ddr: optional(&self.ram_ddr),
            gpu: optional(&self.gpu),
            gpu_memory: optional(&self.gpu_memory),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn type_options() -> Vec<SelectOption> {
    CREATABLE_DEVICE_TYPES
        .iter()
        .map(|t| SelectOption::new(t.as_str(), t.display_name()))
        .collect()
}

fn status_options() -> Vec<SelectOption> {
    DeviceStatus::all()
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.as_str()))
        .collect()
}

// ============================================================================
// Device Form Component
// ============================================================================

/// Modal form for a new device at the pending placement position
#[component]
pub fn DeviceForm() -> Element {
    let mut values = use_signal(DeviceFormValues::new);
    let mut form_error = use_signal(|| None::<String>);

    let pending = APP_STATE.read().session.pending_placement();
    let Some(at) = pending else {
        return rsx! {};
    };

    let submit = move |_| {
        let mut next = values.read().clone();
        let result = next.submit_with(|draft| {
            dispatch(Intent::SubmitDevice(draft));
            // The session drops the pending position once it accepts a draft
            APP_STATE.read().session.pending_placement().is_none()
        });
        match result {
            Ok(()) => {
                form_error.set(None);
                values.set(next);
            }
            Err(e) => form_error.set(Some(e.to_string())),
        }
    };

    // Field setters, one closure per text field
    macro_rules! field {
        ($name:ident) => {
            move |v: String| values.write().$name = v
        };
    }

    let current = values.read().clone();
    let placed_at = format!("At ({:.0}, {:.0})", at.x, at.y);
    let is_pc = current.device_type == DeviceType::Pc.as_str();

    rsx! {
        div {
            class: "dialog-overlay",
            onkeydown: move |e| {
                if e.key() == Key::Escape {
                    e.stop_propagation();
                    dispatch(Intent::DismissDeviceForm);
                }
            },

            form {
                class: "dialog device-form",
                onsubmit: move |e| {
                    e.prevent_default();
                },

                h2 { class: "dialog-title", "New device" }
                p { class: "dialog-subtitle", "{placed_at}" }

                div {
                    class: "form-grid",
                    TextInput {
                        label: "Name".to_string(),
                        value: current.name.clone(),
                        required: true,
                        on_change: field!(name),
                    }
                    Select {
                        label: "Type".to_string(),
                        value: current.device_type.clone(),
                        options: type_options(),
                        on_change: field!(device_type),
                    }
                    TextInput {
                        label: "IP".to_string(),
                        value: current.ip.clone(),
                        placeholder: "192.168.1.10".to_string(),
                        on_change: field!(ip),
                    }
                    Select {
                        label: "Status".to_string(),
                        value: current.status.clone(),
                        options: status_options(),
                        on_change: field!(status),
                    }
                    TextInput {
                        label: "User".to_string(),
                        value: current.user.clone(),
                        on_change: field!(user),
                    }
                    TextInput {
                        label: "Place".to_string(),
                        value: current.place_name.clone(),
                        on_change: field!(place_name),
                    }
                    TextInput {
                        label: "Description".to_string(),
                        value: current.description.clone(),
                        on_change: field!(description),
                    }
                }

                if is_pc {
                    h3 { class: "form-section", "Hardware" }
                    div {
                        class: "form-grid",
                        TextInput { label: "CPU".to_string(), value: current.cpu.clone(), on_change: field!(cpu) }
                        TextInput { label: "CPU benchmark".to_string(), value: current.cpu_benchmark.clone(), on_change: field!(cpu_benchmark) }
                        TextInput {
                            label: "RAM (GB)".to_string(),
                            value: current.ram.clone(),
                            input_type: "number".to_string(),
                            on_change: field!(ram),
                        }
                        TextInput { label: "RAM type".to_string(), value: current.ram_ddr.clone(), on_change: field!(ram_ddr) }
                        TextInput { label: "Motherboard".to_string(), value: current.motherboard.clone(), on_change: field!(motherboard) }
                        TextInput { label: "Disks".to_string(), value: current.disks.clone(), on_change: field!(disks) }
                        TextInput { label: "GPU".to_string(), value: current.gpu.clone(), on_change: field!(gpu) }
                        TextInput { label: "GPU memory".to_string(), value: current.gpu_memory.clone(), on_change: field!(gpu_memory) }
                        TextInput { label: "Office".to_string(), value: current.office.clone(), on_change: field!(office) }
                        TextInput { label: "Antivirus".to_string(), value: current.antivirus.clone(), on_change: field!(antivirus) }
                    }
                }

                if let Some(error) = form_error() {
                    p { class: "input-error", "{error}" }
                }

                div {
                    class: "dialog-actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| dispatch(Intent::DismissDeviceForm),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: submit,
                        "Create"
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
