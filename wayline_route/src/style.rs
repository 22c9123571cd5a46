// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-stencil style overrides.
//!
//! Hosts that offer stencil packs let users restyle a stencil for the current
//! session or save the change to their profile. [`LayeredStyleStore`] keeps
//! both layers; a session override shadows a saved one until it is reset.

use alloc::string::String;

use hashbrown::HashMap;

/// Identifies a stencil within a pack.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StencilKey {
    /// Pack the stencil ships in.
    pub pack_id: String,
    /// Stencil within the pack.
    pub stencil_id: String,
}

impl StencilKey {
    /// Create a key.
    pub fn new(pack_id: impl Into<String>, stencil_id: impl Into<String>) -> Self {
        Self {
            pack_id: pack_id.into(),
            stencil_id: stencil_id.into(),
        }
    }
}

/// Storage for style overrides of type `V`.
pub trait StyleStore<V> {
    /// The effective override for `key`, if any.
    fn get(&self, key: &StencilKey) -> Option<&V>;
    /// Override the style of `key`.
    fn set(&mut self, key: StencilKey, value: V);
    /// Drop the most specific override of `key`, returning it.
    fn reset(&mut self, key: &StencilKey) -> Option<V>;
}

/// Which layer an override lives in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StyleLayer {
    /// Lost when the session ends.
    #[default]
    Session,
    /// Persisted with the user's profile.
    Saved,
}

/// A [`StyleStore`] with a session layer over a saved layer.
#[derive(Clone, Debug)]
pub struct LayeredStyleStore<V> {
    session: HashMap<StencilKey, V>,
    saved: HashMap<StencilKey, V>,
}

impl<V> Default for LayeredStyleStore<V> {
    fn default() -> Self {
        Self {
            session: HashMap::new(),
            saved: HashMap::new(),
        }
    }
}

impl<V> LayeredStyleStore<V> {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `key` in a specific layer.
    pub fn set_in(&mut self, layer: StyleLayer, key: StencilKey, value: V) {
        self.layer_mut(layer).insert(key, value);
    }

    /// The override for `key` in `layer` alone.
    pub fn get_in(&self, layer: StyleLayer, key: &StencilKey) -> Option<&V> {
        match layer {
            StyleLayer::Session => self.session.get(key),
            StyleLayer::Saved => self.saved.get(key),
        }
    }

    /// Drop every session override, leaving saved ones in effect.
    pub fn clear_session(&mut self) {
        self.session.clear();
    }

    /// Saved overrides, for persisting.
    pub fn saved(&self) -> impl Iterator<Item = (&StencilKey, &V)> {
        self.saved.iter()
    }

    fn layer_mut(&mut self, layer: StyleLayer) -> &mut HashMap<StencilKey, V> {
        match layer {
            StyleLayer::Session => &mut self.session,
            StyleLayer::Saved => &mut self.saved,
        }
    }
}

impl<V> StyleStore<V> for LayeredStyleStore<V> {
    fn get(&self, key: &StencilKey) -> Option<&V> {
        self.session.get(key).or_else(|| self.saved.get(key))
    }

    /// Writes to the session layer.
    fn set(&mut self, key: StencilKey, value: V) {
        self.session.insert(key, value);
    }

    /// Removes the session override if there is one, otherwise the saved one.
    fn reset(&mut self, key: &StencilKey) -> Option<V> {
        self.session.remove(key).or_else(|| self.saved.remove(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConnectorStyle;

    fn key() -> StencilKey {
        StencilKey::new("flow", "decision")
    }

    fn sharp() -> ConnectorStyle {
        ConnectorStyle {
            sharp: true,
            ..ConnectorStyle::default()
        }
    }

    #[test]
    fn session_shadows_saved() {
        let mut store = LayeredStyleStore::new();
        store.set_in(StyleLayer::Saved, key(), ConnectorStyle::default());
        store.set(key(), sharp());
        assert_eq!(store.get(&key()), Some(&sharp()));
        assert_eq!(store.get_in(StyleLayer::Saved, &key()), Some(&ConnectorStyle::default()));

        // First reset peels the session layer, the second the saved one.
        assert_eq!(store.reset(&key()), Some(sharp()));
        assert_eq!(store.get(&key()), Some(&ConnectorStyle::default()));
        assert_eq!(store.reset(&key()), Some(ConnectorStyle::default()));
        assert_eq!(store.get(&key()), None);
        assert_eq!(store.reset(&key()), None);
    }

    #[test]
    fn clearing_the_session_keeps_saved_overrides() {
        let mut store = LayeredStyleStore::new();
        store.set(StencilKey::new("flow", "start"), sharp());
        store.set_in(StyleLayer::Saved, key(), sharp());
        store.clear_session();
        assert_eq!(store.get(&StencilKey::new("flow", "start")), None);
        assert_eq!(store.get(&key()), Some(&sharp()));
        assert_eq!(store.saved().count(), 1);
    }
}
