//! Clone orchestrator.
//!
//! Drives the writers over a source catalog, strictly sequentially. Every
//! remote call is awaited before the next one is issued, so run-log lines and
//! target writes come out in program order.

use std::collections::{HashMap, HashSet};

use appwrite_client::{ApiError, AppwriteClient};
use appwrite_types::{Collection, Database, NodeKind, SelectionNode, SelectionTree, Team, User};
use tracing::{debug, info, instrument, warn};

use crate::log::LogSink;
use crate::policy::WriteOutcome;
use crate::writers::{DocumentOutcome, TargetWriter};

/// First line of every run.
pub const RUN_START_MARKER: &str = "----------------";

/// Last line of every run.
pub const RUN_END_MARKER: &str = "Finished clone run";

/// Snapshot of the source taken before a run.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    /// Databases with their collections, then the users and teams roots.
    pub tree: SelectionTree,
    /// Collections as fetched, keyed by database id.
    pub collections: HashMap<String, Vec<Collection>>,
    pub users: Vec<User>,
    /// Teams hydrated with their memberships.
    pub teams: Vec<Team>,
}

impl SourceCatalog {
    /// Fetched collections of one database, in source order.
    pub fn collections_of(&self, database_id: &str) -> &[Collection] {
        self.collections
            .get(database_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Reads from the source and writes to the target.
pub struct CloneEngine {
    source: AppwriteClient,
    target: TargetWriter,
}

impl CloneEngine {
    pub fn new(source: AppwriteClient, target: TargetWriter) -> Self {
        Self { source, target }
    }

    /// Read databases, collections, users and teams from the source and build
    /// the (all unchecked) selection tree. Nothing is written; any failure is
    /// returned as is.
    pub async fn fetch_catalog(&self, log: &mut dyn LogSink) -> Result<SourceCatalog, ApiError> {
        log.append("Fetching source databases...".to_string());

        let databases = self.source.list_databases().await?;
        let mut nodes = Vec::with_capacity(databases.len());
        let mut collections = HashMap::with_capacity(databases.len());
        for database in &databases.items {
            let listed = self.source.list_collections(&database.id).await?;
            let children = listed
                .items
                .iter()
                .map(|c| SelectionNode::leaf(&c.id, &c.name))
                .collect();
            nodes.push(SelectionNode::with_children(
                &database.id,
                &database.name,
                children,
            ));
            collections.insert(database.id.clone(), listed.items);
        }

        let users = self.source.list_users().await?;
        let teams = self.source.list_teams().await?;
        let tree = SelectionTree::with_synthetic_roots(nodes, users.total, teams.total);

        log.append(format!(
            "Found {} databases, {} users and {} teams",
            tree.nodes().len(),
            users.len(),
            teams.len()
        ));
        info!(
            databases = databases.len(),
            users = users.len(),
            teams = teams.len(),
            "Fetched source catalog"
        );

        Ok(SourceCatalog {
            tree,
            collections,
            users: users.items,
            teams: teams.items,
        })
    }

    /// Clone every checked top-level node of `catalog.tree`, in tree order.
    pub async fn run(&self, catalog: &SourceCatalog, log: &mut dyn LogSink) {
        log.append(RUN_START_MARKER.to_string());
        for node in catalog.tree.checked_roots() {
            match node.kind() {
                NodeKind::Users => self.clone_users(&catalog.users, log).await,
                NodeKind::Teams => self.clone_teams(&catalog.teams, log).await,
                NodeKind::Database => {
                    let collections = catalog.collections_of(&node.id);
                    self.clone_database(node, collections, log).await
                }
            }
        }
        log.append(RUN_END_MARKER.to_string());
    }

    pub async fn clone_users(&self, users: &[User], log: &mut dyn LogSink) {
        log.append("Cloning users...".to_string());
        for user in users {
            let line = match self.target.create_user(user).await {
                WriteOutcome::Created(_) | WriteOutcome::Replaced(_) => {
                    format!("Cloned user {}", user.email)
                }
                WriteOutcome::Existed(_) => format!("User {} existed", user.email),
                WriteOutcome::Failed(err) => format!("User {} - {}", user.email, err.message()),
            };
            log.append(line);
        }
        log.append("Finished cloning users".to_string());
    }

    /// Clone teams, each followed by its memberships. Memberships are
    /// attempted even when the team itself could not be created.
    pub async fn clone_teams(&self, teams: &[Team], log: &mut dyn LogSink) {
        log.append("Cloning teams...".to_string());
        for team in teams {
            let line = match self.target.create_team(team).await {
                WriteOutcome::Created(_) | WriteOutcome::Replaced(_) => {
                    format!("Cloned team {}", team.name)
                }
                WriteOutcome::Existed(_) => format!("Team {} existed", team.name),
                WriteOutcome::Failed(err) => format!("Team {} - {}", team.name, err.message()),
            };
            log.append(line);

            log.append("Cloning team memberships...".to_string());
            for membership in &team.memberships {
                let outcome = self.target.create_membership(&team.id, membership).await;
                let line = match outcome.error() {
                    None => format!("Cloned team membership {}", membership.user_email),
                    Some(err) => format!("{} - {}", membership.user_email, err.message()),
                };
                log.append(line);
            }
            log.append("Finished cloning team memberships".to_string());
        }
    }

    /// Clone one database node and its checked collections.
    ///
    /// `collections` is the database's collection snapshot from the catalog.
    /// Three stages, each finished for every checked collection before the
    /// next begins: collections, then attributes, then documents. Attributes
    /// may point at sibling collections and documents need their attributes.
    #[instrument(skip_all, fields(database_id = %node.id))]
    pub async fn clone_database(
        &self,
        node: &SelectionNode,
        collections: &[Collection],
        log: &mut dyn LogSink,
    ) {
        log.append(format!("Clone {}...", node.name));

        let database = Database {
            id: node.id.clone(),
            name: node.name.clone(),
        };
        let line = match self.target.create_database(&database).await {
            WriteOutcome::Created(_) | WriteOutcome::Replaced(_) => {
                format!("Created database {}", node.name)
            }
            WriteOutcome::Existed(_) => format!("Database {} existed", node.name),
            WriteOutcome::Failed(err) => format!("Database {} - {}", node.name, err.message()),
        };
        log.append(line);

        log.append(format!("Cloning database {}'s collections", node.name));
        let checked = checked_collections(node, collections);

        for collection in &checked {
            let line = match self.target.create_collection(&node.id, collection).await {
                WriteOutcome::Created(_) | WriteOutcome::Replaced(_) => {
                    format!("Created collection {}", collection.name)
                }
                WriteOutcome::Existed(err) | WriteOutcome::Failed(err) => {
                    format!("{} - {}", collection.name, err.message())
                }
            };
            log.append(line);
        }

        let in_run: HashSet<&str> = checked.iter().map(|c| c.id.as_str()).collect();
        for collection in &checked {
            self.clone_attributes(&node.id, collection, &in_run, log).await;
        }

        for collection in &checked {
            self.clone_documents(&node.id, collection, log).await;
        }

        log.append(format!("Finished cloning database {}", node.name));
    }

    /// Clone a collection's attributes. The child side of a two-way
    /// relationship is skipped when its parent collection is part of the
    /// run, since creating the parent side creates it.
    async fn clone_attributes(
        &self,
        database_id: &str,
        collection: &Collection,
        in_run: &HashSet<&str>,
        log: &mut dyn LogSink,
    ) {
        let attributes = match self.source.list_attributes(database_id, &collection.id).await {
            Ok(list) => list.items,
            Err(err) => {
                log.append(format!(
                    "Could not read attributes of {} - {}",
                    collection.name,
                    err.message()
                ));
                return;
            }
        };

        let mut created = 0;
        for attribute in &attributes {
            let parent_in_run = attribute
                .related_collection
                .as_deref()
                .is_some_and(|related| in_run.contains(related));
            if attribute.is_relationship_child() && parent_in_run {
                debug!(key = %attribute.key, "Skipping child side of relationship");
                continue;
            }
            if self
                .target
                .create_attribute(database_id, &collection.id, attribute)
                .await
            {
                created += 1;
            }
        }
        debug!(
            collection_id = %collection.id,
            created,
            total = attributes.len(),
            "Cloned attributes"
        );
    }

    async fn clone_documents(
        &self,
        database_id: &str,
        collection: &Collection,
        log: &mut dyn LogSink,
    ) {
        let documents = match self.source.list_documents(database_id, &collection.id).await {
            Ok(list) => list.items,
            Err(err) => {
                log.append(format!(
                    "Could not read documents of {} - {}",
                    collection.name,
                    err.message()
                ));
                return;
            }
        };

        for document in &documents {
            match self.target.create_document(document).await {
                DocumentOutcome::Created => {}
                DocumentOutcome::Updated => log.append(format!("Document {} updated", document.id)),
                DocumentOutcome::CreatedFlattened => log.append(format!(
                    "Document {} created with flattened relationships",
                    document.id
                )),
                DocumentOutcome::Failed(err) => {
                    log.append(format!("Document {} - {}", document.id, err.message()))
                }
            }
        }

        log.append(format!(
            "Finished cloning collection {} ({} documents)",
            collection.name,
            documents.len()
        ));
    }
}

/// The node's checked children, resolved against the fetched collections, in
/// fetch order. Children missing from the snapshot are skipped.
fn checked_collections<'a>(
    node: &SelectionNode,
    collections: &'a [Collection],
) -> Vec<&'a Collection> {
    node.checked_children()
        .filter_map(|child| {
            let found = collections.iter().find(|c| c.id == child.id);
            if found.is_none() {
                warn!(collection_id = %child.id, "Checked collection missing from the catalog");
            }
            found
        })
        .collect()
}
