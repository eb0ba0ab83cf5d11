//! Event listeners and observers that can be torn down again.
//!
//! Closures are kept alive here instead of being leaked, so unmounting can
//! detach them. Removal is idempotent.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web::Event)>,
}

#[derive(Default)]
pub struct ListenerSet {
    items: Vec<Listener>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn add(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        match target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
            Ok(()) => self.items.push(Listener {
                target: target.clone(),
                kind,
                callback,
            }),
            Err(e) => log::warn!("[listeners] could not add `{kind}`: {:?}", e),
        }
    }

    pub fn remove_all(&mut self) {
        for l in self.items.drain(..) {
            _ = l
                .target
                .remove_event_listener_with_callback(l.kind, l.callback.as_ref().unchecked_ref());
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.remove_all();
    }
}

/// Watches theme-bearing attributes on `<html>` and `<body>`.
pub struct ThemeObserver {
    observer: web::MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web::MutationObserver)>,
}

impl ThemeObserver {
    pub fn observe(
        document: &web::Document,
        mut on_change: impl FnMut() + 'static,
    ) -> anyhow::Result<Self> {
        let callback = Closure::wrap(Box::new(move |_: js_sys::Array, _: web::MutationObserver| {
            on_change();
        }) as Box<dyn FnMut(js_sys::Array, web::MutationObserver)>);
        let observer = web::MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("MutationObserver: {:?}", e))?;

        let filter = js_sys::Array::new();
        for attr in ["class", "style", "data-theme", "data-mode"] {
            filter.push(&attr.into());
        }
        let init = web::MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_filter(&filter);

        if let Some(root) = document.document_element() {
            _ = observer.observe_with_options(&root, &init);
        }
        if let Some(body) = document.body() {
            _ = observer.observe_with_options(&body, &init);
        }
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for ThemeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Reports the content-box size of an element whenever layout changes it.
pub struct SizeObserver {
    observer: web::ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web::ResizeObserver)>,
}

impl SizeObserver {
    pub fn observe(
        target: &web::Element,
        mut on_resize: impl FnMut(f64, f64) + 'static,
    ) -> anyhow::Result<Self> {
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _: web::ResizeObserver| {
            let Ok(entry) = entries.get(0).dyn_into::<web::ResizeObserverEntry>() else {
                return;
            };
            let rect = entry.content_rect();
            on_resize(rect.width(), rect.height());
        }) as Box<dyn FnMut(js_sys::Array, web::ResizeObserver)>);
        let observer = web::ResizeObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("ResizeObserver: {:?}", e))?;
        observer.observe(target);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for SizeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
