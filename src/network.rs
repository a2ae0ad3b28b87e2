//! A [`Graph`] wrapped with vertex, edge and graph-level attributes.
//!
//! Attributes are metadata only: no model term reads them, so sampling over
//! [`Network::graph_mut`] behaves exactly as sampling over a bare graph. Edge attributes are
//! keyed by the unordered vertex pair and are only visible while that edge exists.

use std::collections::HashMap;

use crate::error::{ErgmError, Result};
use crate::graph::Graph;

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

/// A graph plus attribute tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    graph: Graph,
    vertex_attrs: HashMap<String, Vec<AttrValue>>,
    edge_attrs: HashMap<String, HashMap<(usize, usize), AttrValue>>,
    graph_attrs: HashMap<String, AttrValue>,
}

impl Network {
    /// Wraps `graph` with empty attribute tables.
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the graph, e.g. to run a sampler over it in place.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Sets a vertex attribute; `values` must hold exactly one value per vertex.
    pub fn set_vertex_attribute<V: Into<AttrValue>>(
        &mut self,
        name: &str,
        values: Vec<V>,
    ) -> Result<()> {
        let expected = self.graph.n_vertices();
        if values.len() != expected {
            return Err(ErgmError::AttributeLength {
                name: name.to_string(),
                expected,
                got: values.len(),
            });
        }
        self.vertex_attrs.insert(
            name.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
        Ok(())
    }

    /// Value of vertex attribute `name` at 1-based `vertex`, `None` if the attribute is unset.
    pub fn vertex_attribute(&self, name: &str, vertex: usize) -> Result<Option<&AttrValue>> {
        let n = self.graph.n_vertices();
        if vertex == 0 || vertex > n {
            return Err(ErgmError::VertexOutOfRange { vertex, n });
        }
        Ok(self
            .vertex_attrs
            .get(name)
            .map(|values| &values[vertex - 1]))
    }

    /// All values of vertex attribute `name`, in vertex order.
    pub fn vertex_attribute_values(&self, name: &str) -> Option<&[AttrValue]> {
        self.vertex_attrs.get(name).map(Vec::as_slice)
    }

    /// Sets an attribute on the existing edge `{u, v}`.
    pub fn set_edge_attribute<V: Into<AttrValue>>(
        &mut self,
        name: &str,
        u: usize,
        v: usize,
        value: V,
    ) -> Result<()> {
        if !self.graph.contains_edge(u, v)? {
            return Err(ErgmError::MissingEdge { u, v });
        }
        self.edge_attrs
            .entry(name.to_string())
            .or_default()
            .insert(edge_key(u, v), value.into());
        Ok(())
    }

    /// Attribute `name` of edge `{u, v}`, `None` if unset or the edge no longer exists.
    ///
    /// Values stay stored while the edge is absent, so an edge the sampler removes and later
    /// re-adds gets its old metadata back. Call [`Network::prune_edge_attributes`] to drop them.
    pub fn edge_attribute(&self, name: &str, u: usize, v: usize) -> Result<Option<&AttrValue>> {
        if !self.graph.contains_edge(u, v)? {
            return Ok(None);
        }
        Ok(self
            .edge_attrs
            .get(name)
            .and_then(|values| values.get(&edge_key(u, v))))
    }

    /// Drops stored edge attribute values whose edge no longer exists in the graph.
    /// Returns how many values were removed.
    pub fn prune_edge_attributes(&mut self) -> usize {
        let graph = &self.graph;
        let mut removed = 0;
        for values in self.edge_attrs.values_mut() {
            let before = values.len();
            values.retain(|&(u, v), _| graph.contains_edge(u, v).unwrap_or(false));
            removed += before - values.len();
        }
        self.edge_attrs.retain(|_, values| !values.is_empty());
        removed
    }

    pub fn set_graph_attribute<V: Into<AttrValue>>(&mut self, name: &str, value: V) {
        self.graph_attrs.insert(name.to_string(), value.into());
    }

    pub fn graph_attribute(&self, name: &str) -> Option<&AttrValue> {
        self.graph_attrs.get(name)
    }
}

fn edge_key(u: usize, v: usize) -> (usize, usize) {
    if u < v {
        (u, v)
    } else {
        (v, u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{run_sampler, SamplerConfig};
    use crate::terms::{Model, Term};

    fn network() -> Network {
        Network::new(Graph::from_edges(4, &[(1, 2), (2, 3), (3, 1), (3, 4)]).unwrap())
    }

    #[test]
    fn test_vertex_attributes_need_one_value_per_vertex() {
        let mut net = network();
        let err = net.set_vertex_attribute("age", vec![30_i64, 40]).unwrap_err();
        assert_eq!(
            err,
            ErgmError::AttributeLength {
                name: "age".to_string(),
                expected: 4,
                got: 2
            }
        );
        assert!(net.vertex_attribute_values("age").is_none());

        net.set_vertex_attribute("age", vec![30_i64, 40, 50, 60]).unwrap();
        assert_eq!(
            net.vertex_attribute("age", 3).unwrap(),
            Some(&AttrValue::Int(50))
        );
        assert!(net.vertex_attribute("age", 5).is_err());
        assert_eq!(net.vertex_attribute("height", 1).unwrap(), None);
    }

    #[test]
    fn test_edge_attributes_require_an_edge() {
        let mut net = network();
        assert_eq!(
            net.set_edge_attribute("weight", 1, 4, 0.5),
            Err(ErgmError::MissingEdge { u: 1, v: 4 })
        );
        net.set_edge_attribute("weight", 3, 1, 0.5).unwrap();
        assert_eq!(
            net.edge_attribute("weight", 1, 3).unwrap(),
            Some(&AttrValue::Float(0.5))
        );

        net.graph_mut().remove_edge(1, 3).unwrap();
        assert_eq!(net.edge_attribute("weight", 1, 3).unwrap(), None);
    }

    #[test]
    fn test_readded_edge_keeps_metadata_until_pruned() {
        let mut net = network();
        net.set_edge_attribute("weight", 1, 3, 0.5).unwrap();
        net.set_edge_attribute("weight", 2, 3, 1.5).unwrap();

        net.graph_mut().remove_edge(1, 3).unwrap();
        net.graph_mut().add_edge(1, 3).unwrap();
        assert_eq!(
            net.edge_attribute("weight", 1, 3).unwrap(),
            Some(&AttrValue::Float(0.5))
        );

        net.graph_mut().remove_edge(1, 3).unwrap();
        assert_eq!(net.prune_edge_attributes(), 1);
        net.graph_mut().add_edge(1, 3).unwrap();
        assert_eq!(net.edge_attribute("weight", 1, 3).unwrap(), None);
        assert_eq!(
            net.edge_attribute("weight", 2, 3).unwrap(),
            Some(&AttrValue::Float(1.5))
        );
        assert_eq!(net.prune_edge_attributes(), 0);
    }

    #[test]
    fn test_graph_attributes() {
        let mut net = network();
        net.set_graph_attribute("name", "toy");
        assert_eq!(
            net.graph_attribute("name"),
            Some(&AttrValue::Text("toy".to_string()))
        );
        assert_eq!(net.graph_attribute("missing"), None);
    }

    #[test]
    fn test_attributes_do_not_affect_sampling() {
        let model = Model::new(vec![Term::Edges, Term::Triangles], vec![-0.5, 0.2]).unwrap();
        let config = SamplerConfig::default().burn_in(100).seed(3);

        let mut bare = network().into_graph();
        let plain = run_sampler(&mut bare, &model, 50, &config).unwrap();

        let mut net = network();
        net.set_vertex_attribute("group", vec!["a", "b", "a", "b"]).unwrap();
        net.set_graph_attribute("directed", false);
        let wrapped = run_sampler(net.graph_mut(), &model, 50, &config).unwrap();

        assert_eq!(plain, wrapped);
        assert_eq!(&bare, net.graph());
    }
}
