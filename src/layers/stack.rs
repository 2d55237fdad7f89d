//! Ordered layer collection with stable ids.
//!
//! Position in the collection is the z-order: index 0 is painted first and
//! sits farthest away; the last layer is nearest. There is no separate
//! depth field.

use serde::{Deserialize, Serialize};

use super::params::{BlendPair, LayerKind, LayerParams, ParamMap};

/// One configured skybox layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique id, assigned at creation and never reassigned. The kind is
    /// likewise fixed: only parameter values change after creation.
    id: u32,
    pub name: String,
    pub visible: bool,
    pub seed: u32,
    pub blend: BlendPair,
    pub params: LayerParams,
}

impl Layer {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.params.kind()
    }

    /// Flat string-map view of the layer (the serialization surface).
    pub fn to_params(&self) -> ParamMap {
        let mut map = ParamMap::new();
        map.insert("type".into(), self.kind().name().into());
        map.insert("name".into(), self.name.clone());
        map.insert("visible".into(), self.visible.to_string());
        map.insert("seed".into(), self.seed.to_string());
        map.insert("sourceBlendFactor".into(), self.blend.source.name().into());
        map.insert("destBlendFactor".into(), self.blend.dest.name().into());
        self.params.emit(&mut map);
        map
    }

    /// Applies a (possibly partial) flat map. The `type` key is ignored:
    /// kind is immutable once created. Malformed values keep their current
    /// setting.
    pub fn apply_params(&mut self, map: &ParamMap) {
        if let Some(name) = map.get("name") {
            self.name = name.clone();
        }
        super::params::apply_bool(map, "visible", &mut self.visible);
        super::params::apply_u32(map, "seed", &mut self.seed);
        if let Some(f) = map
            .get("sourceBlendFactor")
            .and_then(|v| super::params::BlendFactor::from_name(v))
        {
            self.blend.source = f;
        }
        if let Some(f) = map
            .get("destBlendFactor")
            .and_then(|v| super::params::BlendFactor::from_name(v))
        {
            self.blend.dest = f;
        }
        self.params.apply(map);
    }
}

/// The ordered collection of layers forming a skybox.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerStack {
    layers: Vec<Layer>,
    next_id: u32,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer of the given kind with default parameters at the
    /// nearest (top) position and returns its fresh id.
    pub fn add(&mut self, kind: LayerKind) -> u32 {
        self.add_with(LayerParams::defaults(kind))
    }

    /// Appends a layer with explicit parameters; returns its fresh id.
    pub fn add_with(&mut self, params: LayerParams) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let ordinal = self.layers.len() + 1;
        self.layers.push(Layer {
            id,
            name: format!("{} layer {}", params.kind().name(), ordinal),
            visible: true,
            seed: id,
            blend: BlendPair::default(),
            params,
        });
        id
    }

    /// Deep-copies a layer, inserting the copy immediately above the source.
    /// Returns the new id, or `None` if the id does not exist.
    pub fn duplicate(&mut self, id: u32) -> Option<u32> {
        let index = self.position(id)?;
        let mut copy = self.layers[index].clone();
        let new_id = self.next_id;
        self.next_id += 1;
        copy.id = new_id;
        copy.name.push_str(" copy");
        self.layers.insert(index + 1, copy);
        Some(new_id)
    }

    /// Removes a layer, closing the gap. Other ids are never reassigned.
    pub fn delete(&mut self, id: u32) -> bool {
        match self.position(id) {
            Some(index) => {
                self.layers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Swaps the layer with its nearer neighbor. Fails at the top (nearest)
    /// boundary or for an unknown id.
    pub fn move_up(&mut self, id: u32) -> bool {
        match self.position(id) {
            Some(index) if index + 1 < self.layers.len() => {
                self.layers.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Swaps the layer with its farther neighbor. Fails at the bottom
    /// (farthest) boundary or for an unknown id.
    pub fn move_down(&mut self, id: u32) -> bool {
        match self.position(id) {
            Some(index) if index > 0 => {
                self.layers.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    pub fn set_visible(&mut self, id: u32, visible: bool) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Applies a partial flat-map update to a layer's parameters.
    pub fn update_params(&mut self, id: u32, map: &ParamMap) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.apply_params(map);
                true
            }
            None => false,
        }
    }

    /// Z-order index of a layer id (0 = farthest).
    pub fn position(&self, id: u32) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn layer(&self, id: u32) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: u32) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Iterates layers in paint order (farthest first).
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}
