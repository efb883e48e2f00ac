//! Synthetic tag group corpora.
//!
//! Each corpus models the tags a process collector would see for a set of entities, with varying amounts of overlap
//! between entities. Every corpus is generated from a fixed seed, so it is identical from run to run.
use std::collections::HashSet;

use rand::{rngs::SmallRng, Rng as _, SeedableRng as _};

pub type TagGroups = Vec<Vec<String>>;

const SEED: u64 = 0xC0FFEE;
const GROUPS_PER_CORPUS: usize = 1_000;

/// Mostly unique tags: every entity has its own identifiers, with only a couple of tags shared across the board.
pub fn low_dups() -> TagGroups {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let envs = ["prod", "staging", "dev"];

    (0..GROUPS_PER_CORPUS)
        .map(|i| {
            let mut tags = vec![format!("env:{}", envs[rng.random_range(0..envs.len())])];
            tags.push(format!("pid:{}", 1_000 + i));
            tags.push(format!("container_id:{:016x}", rng.random::<u64>()));
            tags.push(format!("image_tag:{:08x}", rng.random::<u32>()));

            let extra = rng.random_range(4..12);
            for j in 0..extra {
                tags.push(format!("label_{}:{:x}", j, rng.random::<u32>()));
            }
            tags
        })
        .collect()
}

/// Mostly shared tags: every entity carries the same large cluster-level tag set, plus a few identifiers of its own.
pub fn high_dups() -> TagGroups {
    let mut rng = SmallRng::seed_from_u64(SEED + 1);

    let base = [
        "env:prod",
        "region:us-east-1",
        "availability_zone:us-east-1a",
        "kube_cluster_name:prod-us1",
        "kube_namespace:payments",
        "kube_deployment:payments-api",
        "kube_replica_set:payments-api-7d9c8b",
        "kube_service:payments-api",
        "service:payments-api",
        "version:1.42.0",
        "team:payments",
        "cloud_provider:aws",
        "instance-type:m5.2xlarge",
        "kernel:5.15.0-1051-aws",
        "os:linux",
        "image_name:payments-api",
        "image_tag:1.42.0",
        "short_image:payments-api",
        "container_name:payments-api",
        "orch_cluster_id:1f2e3d4c",
    ];

    (0..GROUPS_PER_CORPUS)
        .map(|i| {
            let mut tags = base.iter().map(|tag| tag.to_string()).collect::<Vec<_>>();
            tags.push(format!("pod_name:payments-api-7d9c8b-{:05}", i));
            tags.push(format!("container_id:{:016x}", rng.random::<u64>()));
            tags
        })
        .collect()
}

/// Several overlapping tag families: entities belong to one of a handful of deployments, each with its own tag set, on
/// top of tags shared by the whole cluster. Some entities repeat a tag within their own group.
pub fn high_dups_2() -> TagGroups {
    let mut rng = SmallRng::seed_from_u64(SEED + 2);

    let deployments = ["checkout", "cart", "search", "frontend", "auth", "inventory", "shipping", "ads"];
    let cluster = ["env:staging", "kube_cluster_name:staging-eu1", "region:eu-west-1", "cloud_provider:gcp"];

    (0..GROUPS_PER_CORPUS)
        .map(|i| {
            let deployment = deployments[rng.random_range(0..deployments.len())];
            let version = rng.random_range(1..4);

            let mut tags = cluster.iter().map(|tag| tag.to_string()).collect::<Vec<_>>();
            tags.push(format!("kube_deployment:{}", deployment));
            tags.push(format!("kube_namespace:{}", deployment));
            tags.push(format!("service:{}", deployment));
            tags.push(format!("version:{}.0.{}", version, rng.random_range(0..3)));
            tags.push(format!("image_name:gcr.io/shop/{}", deployment));
            tags.push(format!("image_tag:v{}", version));
            tags.push(format!("pod_name:{}-{:04}", deployment, i % 250));

            if rng.random_bool(0.1) {
                tags.push(format!("service:{}", deployment));
            }
            tags
        })
        .collect()
}

/// All corpora, one after the other.
pub fn combined() -> TagGroups {
    let mut groups = low_dups();
    groups.extend(high_dups());
    groups.extend(high_dups_2());
    groups
}

/// All corpora, by name.
pub fn all() -> Vec<(&'static str, TagGroups)> {
    vec![
        ("low_dups", low_dups()),
        ("high_dups", high_dups()),
        ("high_dups_2", high_dups_2()),
        ("combined", combined()),
    ]
}

/// Returns the number of distinct tags across all groups.
pub fn distinct_tags(groups: &[Vec<String>]) -> usize {
    groups.iter().flatten().collect::<HashSet<_>>().len()
}

/// Returns the total number of tags across all groups.
pub fn total_tags(groups: &[Vec<String>]) -> usize {
    groups.iter().map(Vec::len).sum()
}
