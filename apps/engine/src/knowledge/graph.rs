use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::heuristics::keyword::Tokens;
use crate::prng::SeededRng;

/// Larger concept lists are truncated.
pub const MAX_CONCEPTS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Concept,
    Entity,
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    IsA,
    HasProperty,
    RelatesTo,
    PartOf,
    DependsOn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub properties: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEdge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub domain: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<KnowledgeNode>,
    pub edges: Vec<KnowledgeEdge>,
    pub metadata: GraphMetadata,
}

struct Vocabulary {
    triggers: &'static [&'static str],
    entities: &'static [&'static str],
    properties: &'static [&'static str],
}

const VOCABULARIES: &[Vocabulary] = &[
    Vocabulary {
        triggers: &[
            "property", "properties", "housing", "letting", "lettings", "rental", "real estate",
            "tenancy",
        ],
        entities: &["landlord", "tenant", "letting agent", "tenancy agreement", "inspection"],
        properties: &["rent", "deposit", "location", "condition", "energy rating"],
    },
    Vocabulary {
        triggers: &["student", "students", "university", "education", "campus"],
        entities: &["student", "university", "accommodation office", "course", "society"],
        properties: &["term dates", "budget", "commute", "year of study"],
    },
    Vocabulary {
        triggers: &["marketplace", "commerce", "shop", "shopping", "resale"],
        entities: &["seller", "buyer", "listing", "category", "review"],
        properties: &["price", "condition", "delivery", "rating"],
    },
    Vocabulary {
        triggers: &["job", "jobs", "employment", "career", "careers", "recruitment"],
        entities: &["employer", "candidate", "vacancy", "skill", "interview"],
        properties: &["salary", "hours", "location", "contract type"],
    },
];

const GENERIC_VOCABULARY: Vocabulary = Vocabulary {
    triggers: &[],
    entities: &["actor", "resource", "process", "outcome"],
    properties: &["priority", "status", "owner", "cost"],
};

fn vocabulary_for(domain: &str) -> &'static Vocabulary {
    let tokens = Tokens::new(domain);
    VOCABULARIES
        .iter()
        .find(|v| tokens.count_any(v.triggers) > 0)
        .unwrap_or(&GENERIC_VOCABULARY)
}

fn weight(rng: &mut SeededRng, min: f64, max: f64) -> f64 {
    (rng.range(min, max) * 100.0).round() / 100.0
}

struct GraphBuilder {
    nodes: Vec<KnowledgeNode>,
    edges: Vec<KnowledgeEdge>,
}

impl GraphBuilder {
    fn node(
        &mut self,
        label: &str,
        node_type: NodeType,
        properties: BTreeMap<String, Value>,
    ) -> String {
        let id = format!("node_{}", self.nodes.len());
        self.nodes.push(KnowledgeNode {
            id: id.clone(),
            label: label.to_string(),
            node_type,
            properties,
        });
        id
    }

    fn edge(&mut self, source: &str, target: &str, relation: Relation, weight: f64) {
        self.edges.push(KnowledgeEdge {
            source: source.to_string(),
            target: target.to_string(),
            relation,
            weight,
        });
    }
}

/// Synthesises a graph for `domain` over `concepts`, stamped with `now`.
///
/// Everything except the timestamp is a pure function of the inputs: edge weights come
/// from a [`SeededRng`] seeded with the lower-cased domain.
pub fn build_knowledge_graph(
    domain: &str,
    concepts: &[String],
    now: DateTime<Utc>,
) -> KnowledgeGraph {
    let domain = domain.trim();
    let vocab = vocabulary_for(domain);
    let mut rng = SeededRng::from_text(&domain.to_lowercase());

    let mut seen = Vec::new();
    let mut concepts: Vec<&str> = concepts
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| {
            let key = c.to_lowercase();
            let fresh = !seen.contains(&key);
            if fresh {
                seen.push(key);
            }
            fresh
        })
        .take(MAX_CONCEPTS)
        .collect();
    if concepts.is_empty() {
        concepts = vocab.entities.iter().take(3).copied().collect();
    }

    let mut g = GraphBuilder {
        nodes: Vec::new(),
        edges: Vec::new(),
    };
    let root_label = if domain.is_empty() { "general" } else { domain };
    let root = g.node(
        root_label,
        NodeType::Concept,
        BTreeMap::from([("root".to_string(), json!(true))]),
    );

    let mut entity_ids: HashMap<&'static str, String> = HashMap::new();
    let mut concept_ids: Vec<String> = Vec::with_capacity(concepts.len());

    for (i, concept) in concepts.iter().enumerate() {
        let concept_id = g.node(
            concept,
            NodeType::Concept,
            BTreeMap::from([("depth".to_string(), json!(1)), ("order".to_string(), json!(i))]),
        );
        g.edge(&concept_id, &root, Relation::IsA, 1.0);

        if let Some(entity) = rng.pick(vocab.entities).copied() {
            let entity_id = match entity_ids.get(entity) {
                Some(id) => id.clone(),
                None => {
                    let id = g.node(entity, NodeType::Entity, BTreeMap::new());
                    entity_ids.insert(entity, id.clone());
                    id
                }
            };
            let w = weight(&mut rng, 0.5, 1.0);
            g.edge(&entity_id, &concept_id, Relation::PartOf, w);
        }

        if let Some(property) = rng.pick(vocab.properties).copied() {
            let property_id = g.node(
                property,
                NodeType::Property,
                BTreeMap::from([("concept".to_string(), json!(concept))]),
            );
            let w = weight(&mut rng, 0.4, 0.9);
            g.edge(&concept_id, &property_id, Relation::HasProperty, w);
        }

        if let Some(previous) = concept_ids.last() {
            let w = weight(&mut rng, 0.3, 0.9);
            g.edge(previous, &concept_id, Relation::RelatesTo, w);
        }
        if i >= 2 && rng.chance(0.3) {
            let w = weight(&mut rng, 0.3, 0.8);
            g.edge(&concept_id, &concept_ids[i - 2], Relation::DependsOn, w);
        }

        concept_ids.push(concept_id);
    }

    debug!(
        domain,
        nodes = g.nodes.len(),
        edges = g.edges.len(),
        "generated knowledge graph"
    );

    KnowledgeGraph {
        metadata: GraphMetadata {
            domain: root_label.to_string(),
            node_count: g.nodes.len(),
            edge_count: g.edges.len(),
            generated_at: now,
        },
        nodes: g.nodes,
        edges: g.edges,
    }
}

pub fn generate_knowledge_graph(domain: &str, concepts: &[String]) -> KnowledgeGraph {
    build_knowledge_graph(domain, concepts, Utc::now())
}
