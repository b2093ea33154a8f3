use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{get_config_path, load_config, roster_path, save_config, LensConfig};
use crate::errors::{MemberLensError, Result};
use crate::resolution::MemberResolver;
use crate::roster::load_roster;
use crate::types::*;

/// Owns the configuration and the loaded pools for one project, and hands
/// out resolvers over them.
pub struct MemberLens {
    config: LensConfig,
    channel: Vec<Identity>,
    community: Vec<Identity>,
    project_root: PathBuf,
}

/// Roster overrides that take precedence over the configured paths.
#[derive(Debug, Clone, Default)]
pub struct RosterOverrides {
    pub channel: Option<PathBuf>,
    pub community: Option<PathBuf>,
}

/// Aggregate statistics about the loaded pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LensStats {
    pub channel_members: usize,
    pub community_members: usize,
    /// Distinct ids appearing in both pools.
    pub shared_members: usize,
    /// Community members carrying a numeric tag.
    pub tagged_members: usize,
    /// Community members with a nickname set.
    pub nicknamed_members: usize,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl MemberLens {
    /// Initializes a project at the given root by writing a default
    /// configuration. Existing configuration is left untouched.
    pub fn init(project_root: &Path) -> Result<LensConfig> {
        if get_config_path(project_root).exists() {
            warn!(root = %project_root.display(), "configuration already exists");
            return load_config(project_root);
        }
        let config = LensConfig::default();
        save_config(project_root, &config)?;
        info!(root = %project_root.display(), "initialized memberlens project");
        Ok(config)
    }

    /// Opens a project, loading both rosters.
    ///
    /// The community roster is required. A configured channel roster that
    /// does not exist is treated as an empty channel.
    pub fn open(project_root: &Path, overrides: &RosterOverrides) -> Result<Self> {
        let config = load_config(project_root)?;

        let community_path = overrides
            .community
            .clone()
            .unwrap_or_else(|| roster_path(project_root, &config.community_roster));
        if !community_path.exists() {
            return Err(MemberLensError::Roster {
                message: "community roster not found; run 'memberlens init' and export a roster"
                    .to_string(),
                path: community_path.display().to_string(),
            });
        }
        let community = load_roster(&community_path)?;

        let channel_path = overrides.channel.clone().or_else(|| {
            config
                .channel_roster
                .as_deref()
                .map(|r| roster_path(project_root, r))
        });
        let channel = match channel_path {
            Some(path) if path.exists() => load_roster(&path)?,
            Some(path) => {
                warn!(path = %path.display(), "channel roster missing, using empty channel");
                Vec::new()
            }
            None => Vec::new(),
        };

        info!(
            channel = channel.len(),
            community = community.len(),
            "rosters loaded"
        );

        Ok(Self {
            config,
            channel,
            community,
            project_root: project_root.to_path_buf(),
        })
    }

    /// Builds a lens directly from in-memory pools with default configuration.
    pub fn from_pools(channel: Vec<Identity>, community: Vec<Identity>) -> Self {
        Self {
            config: LensConfig::default(),
            channel,
            community,
            project_root: PathBuf::from("."),
        }
    }

    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

impl MemberLens {
    /// Returns a resolver borrowing the loaded pools.
    pub fn resolver(&self) -> MemberResolver<'_> {
        MemberResolver::new(&self.channel, &self.community)
    }

    pub fn resolve(&self, token: &str) -> Resolution {
        self.resolver().resolve(token)
    }

    pub fn explain(&self, token: &str) -> Vec<ScoredMatch> {
        self.resolver().explain(token)
    }

    pub fn resolve_all<S: AsRef<str>>(&self, tokens: &[S]) -> ResolutionSummary {
        self.resolver().resolve_all(tokens)
    }

    /// Returns statistics about the loaded pools.
    pub fn stats(&self) -> LensStats {
        let community_ids: HashSet<u64> = self.community.iter().map(|i| i.id).collect();
        let shared: HashSet<u64> = self
            .channel
            .iter()
            .map(|i| i.id)
            .filter(|id| community_ids.contains(id))
            .collect();

        LensStats {
            channel_members: self.channel.len(),
            community_members: self.community.len(),
            shared_members: shared.len(),
            tagged_members: self
                .community
                .iter()
                .filter(|i| i.discriminator.is_some())
                .count(),
            nicknamed_members: self
                .community
                .iter()
                .filter(|i| i.nickname.is_some())
                .count(),
        }
    }
}
