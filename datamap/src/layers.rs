//! Named stacks of [`DataMap2D`] layers sharing one coordinate system.

use crate::{DataMap2D, DataMapError, C};

/// One [`DataMap2D`] per layer name, all comparable to each other.
///
/// Layer order is the order of the names given at construction and is
/// preserved by every per-cell gather/scatter method.
#[derive(Debug, Clone)]
pub struct DataMap3D {
    names: Vec<String>,
    layers: Vec<DataMap2D>,
}

impl DataMap3D {
    /// Builds a stack by replicating `template` once per layer name.
    /// Duplicate names are rejected, as is an empty name list.
    pub fn from_template<S>(template: &DataMap2D, names: &[S]) -> Result<Self, DataMapError>
    where
        S: AsRef<str>,
    {
        if names.is_empty() {
            return Err(DataMapError::EmptyStack);
        }
        let mut owned_names: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if owned_names.iter().any(|n| n == name) {
                return Err(DataMapError::DuplicateLayer(name.to_owned()));
            }
            owned_names.push(name.to_owned());
        }
        let layers = owned_names
            .iter()
            .map(|_| DataMap2D::empty_like(template))
            .collect();
        Ok(Self {
            names: owned_names,
            layers,
        })
    }

    /// Layer names in stack order.
    pub fn layer_names(&self) -> &[String] {
        &self.names
    }

    fn index_of(&self, name: &str) -> Result<usize, DataMapError> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| DataMapError::UnknownLayer(name.to_owned()))
    }

    pub fn layer(&self, name: &str) -> Result<&DataMap2D, DataMapError> {
        Ok(&self.layers[self.index_of(name)?])
    }

    pub fn layer_mut(&mut self, name: &str) -> Result<&mut DataMap2D, DataMapError> {
        let idx = self.index_of(name)?;
        Ok(&mut self.layers[idx])
    }

    /// Replaces a layer wholesale. The replacement must remain
    /// comparable to the layer it displaces.
    pub fn replace_layer(&mut self, name: &str, map: DataMap2D) -> Result<(), DataMapError> {
        let idx = self.index_of(name)?;
        if !self.layers[idx].is_comparable(&map) {
            return Err(DataMapError::Incomparable);
        }
        self.layers[idx] = map;
        Ok(())
    }

    /// Value of every layer at the given indices, in stack order.
    pub fn values_at_index(&self, lat_idx: usize, lon_idx: usize) -> Vec<C> {
        self.layers
            .iter()
            .map(|layer| layer.get(lat_idx, lon_idx))
            .collect()
    }

    /// Sets every layer at the given indices from `values`, which must
    /// match the stack order and length.
    pub fn set_values_at_index(
        &mut self,
        lat_idx: usize,
        lon_idx: usize,
        values: &[C],
    ) -> Result<(), DataMapError> {
        if values.len() != self.layers.len() {
            return Err(DataMapError::LayerValueCount {
                expected: self.layers.len(),
                got: values.len(),
            });
        }
        for (layer, &value) in self.layers.iter_mut().zip(values) {
            layer.set(lat_idx, lon_idx, value);
        }
        Ok(())
    }

    /// Elementwise sum across all layers.
    pub fn sum_all_layers(&self) -> Result<DataMap2D, DataMapError> {
        let names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        self.sum_layers(&names)
    }

    /// Elementwise sum across the named subset of layers.
    pub fn sum_layers<S>(&self, names: &[S]) -> Result<DataMap2D, DataMapError>
    where
        S: AsRef<str>,
    {
        self.combine_across_layers(names, |_, _, _, _, values| {
            Some(values.iter().sum())
        })
    }

    /// Per cell, gathers the ordered tuple of layer values for the
    /// named layers and applies `combine`, writing the result into a
    /// new 2-D map. A `None` from `combine` leaves the cell unset.
    pub fn combine_across_layers<S, F>(
        &self,
        names: &[S],
        mut combine: F,
    ) -> Result<DataMap2D, DataMapError>
    where
        S: AsRef<str>,
        F: FnMut(C, C, usize, usize, &[C]) -> Option<C>,
    {
        let indices = names
            .iter()
            .map(|name| self.index_of(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = DataMap2D::empty_like(&self.layers[0]);
        let mut gathered = vec![0.0; indices.len()];
        out.update_all(|lat, lon, lat_idx, lon_idx, _| {
            for (slot, &layer_idx) in gathered.iter_mut().zip(&indices) {
                *slot = self.layers[layer_idx].get(lat_idx, lon_idx);
            }
            combine(lat, lon, lat_idx, lon_idx, &gathered)
        });
        Ok(out)
    }

    /// Sets every cell of every layer to `fill`.
    pub fn reset_all(&mut self, fill: C) {
        for layer in &mut self.layers {
            layer.reset_all(fill);
        }
    }
}
