//! Leptos Slot Selection
//!
//! Mouse-driven range selection over a grid of time slots.
//! Press on a slot, move over other slots of the same column, release
//! anywhere to commit. A press and release on the same slot selects that
//! single slot.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Inclusive range of slots within one column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRange {
    pub column: u32,
    pub first: u32,
    pub last: u32,
}

impl SlotRange {
    /// Range between two slots of a column, in either order
    pub fn between(column: u32, a: u32, b: u32) -> Self {
        Self {
            column,
            first: a.min(b),
            last: a.max(b),
        }
    }

    pub fn contains(&self, column: u32, slot: u32) -> bool {
        self.column == column && slot >= self.first && slot <= self.last
    }
}

/// Selection state signals
#[derive(Clone, Copy)]
pub struct SelectSignals {
    /// Slot where the press started (column, slot)
    pub anchor_read: ReadSignal<Option<(u32, u32)>>,
    pub anchor_write: WriteSignal<Option<(u32, u32)>>,
    /// Slot currently under the pointer in the anchor column
    pub hover_read: ReadSignal<Option<u32>>,
    pub hover_write: WriteSignal<Option<u32>>,
}

pub fn create_select_signals() -> SelectSignals {
    let (anchor_read, anchor_write) = signal(None::<(u32, u32)>);
    let (hover_read, hover_write) = signal(None::<u32>);
    SelectSignals {
        anchor_read,
        anchor_write,
        hover_read,
        hover_write,
    }
}

/// Range currently being dragged (reactive)
pub fn preview(sel: &SelectSignals) -> Option<SlotRange> {
    let (column, start) = sel.anchor_read.get()?;
    let hover = sel.hover_read.get().unwrap_or(start);
    Some(SlotRange::between(column, start, hover))
}

/// Drop any pending selection
pub fn cancel_selection(sel: &SelectSignals) {
    sel.anchor_write.set(None);
    sel.hover_write.set(None);
}

/// Create mousedown handler for a slot cell
pub fn make_on_slot_mousedown(sel: SelectSignals, column: u32, slot: u32) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            // Presses on rendered entries belong to the entry, not the grid
            if let Some(el) = target.dyn_ref::<web_sys::Element>() {
                if let Ok(Some(_)) = el.closest("[data-no-select]") { return; }
            }
        }
        ev.prevent_default();
        sel.anchor_write.set(Some((column, slot)));
        sel.hover_write.set(Some(slot));
    }
}

/// Create mouseenter handler for a slot cell (extends the pending range)
pub fn make_on_slot_mouseenter(sel: SelectSignals, column: u32, slot: u32) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if let Some((anchor_column, _)) = sel.anchor_read.get_untracked() {
            if anchor_column == column {
                sel.hover_write.set(Some(slot));
            }
        }
    }
}

/// Document-level listener registration; removed when dropped
pub struct SelectBinding {
    on_mouseup: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

impl Drop for SelectBinding {
    fn drop(&mut self) {
        if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
            let _ = doc.remove_event_listener_with_callback("mouseup", self.on_mouseup.as_ref().unchecked_ref());
        }
    }
}

/// Bind the document mouseup handler that commits a selection
///
/// Keep the returned binding alive for as long as the grid is mounted.
pub fn bind_global_mouseup<F>(sel: SelectSignals, on_select: F) -> SelectBinding
where
    F: Fn(SlotRange) + 'static,
{
    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let Some((column, start)) = sel.anchor_read.get_untracked() else {
            return;
        };
        let end = sel.hover_read.get_untracked().unwrap_or(start);
        cancel_selection(&sel);
        on_select(SlotRange::between(column, start, end));
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    SelectBinding { on_mouseup }
}
