// ABOUTME: Builds container-create requests from declarative specs.
// ABOUTME: Pure translation, no daemon I/O; execution lives in the manager.

use crate::daemon::DockerError;
use crate::model::{ContainerSpec, DependencyGraph, RestartPolicy, VolumeSource};
use bollard::models::{ContainerCreateBody, HostConfig, PortBinding, RestartPolicyNameEnum};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Image used when a spec declares none.
pub const DEFAULT_IMAGE: &str = "busybox";

/// Host port bound when a mapping has a separator but no host part.
/// The source model hard-codes this instead of asking the daemon for a free
/// port; kept as-is and pinned by a regression test.
pub const FALLBACK_HOST_PORT: u16 = 32768;

/// Keeps an otherwise-empty container alive long enough to inspect it.
const KEEPALIVE_COMMAND: [&str; 2] = ["sleep", "9999"];

/// A fully populated container-create request, ready to submit.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    /// Daemon-side container name, whitespace-stripped.
    pub name: Option<String>,
    pub body: ContainerCreateBody,
    /// Parsed legacy LXC driver options. The engine API has no field for
    /// them anymore; the submit path logs and omits them.
    pub lxc_conf: Vec<(String, String)>,
}

/// Translate a declarative spec (and its link graph) into a create request.
///
/// Every rule is independently optional: absent or blank attributes simply
/// leave their field unset. The function never talks to the daemon, which is
/// what makes the translation testable on its own.
pub fn build_create_request(
    spec: &ContainerSpec,
    deps: Option<&DependencyGraph>,
) -> Result<CreateRequest, DockerError> {
    let mut body = ContainerCreateBody::default();
    let mut host_config = HostConfig::default();

    // Image, with the keepalive fallback below tied to its absence.
    let image = non_blank(&spec.image).map(str::trim);
    body.image = Some(image.unwrap_or(DEFAULT_IMAGE).to_string());

    // Command: comma-separated tokens. A spec with neither command nor image
    // gets the keepalive command so the created container survives inspection.
    if let Some(command) = non_blank(&spec.command) {
        let tokens = command_tokens(command);
        if !tokens.is_empty() {
            body.cmd = Some(tokens);
        }
    } else if image.is_none() {
        body.cmd = Some(KEEPALIVE_COMMAND.iter().map(|s| s.to_string()).collect());
    }

    // Resources apply only when present and positive.
    if let Some(shares) = spec.cpu_shares.filter(|v| *v > 0) {
        host_config.cpu_shares = Some(shares);
    }
    if let Some(cpus) = non_blank(&spec.cpuset_cpus) {
        host_config.cpuset_cpus = Some(cpus.to_string());
    }
    if let Some(mems) = non_blank(&spec.cpuset_mems) {
        host_config.cpuset_mems = Some(mems.to_string());
    }
    if let Some(memory) = spec.mem_limit.filter(|v| *v > 0) {
        host_config.memory = Some(memory);
    }
    if let Some(swap) = spec.memory_swap.filter(|v| *v > 0) {
        host_config.memory_swap = Some(swap);
    }

    if let Some(hostname) = non_blank(&spec.hostname) {
        body.hostname = Some(strip_whitespace(hostname));
    }
    if let Some(domain) = non_blank(&spec.domain_name) {
        body.domainname = Some(domain.to_string());
    }
    if let Some(user) = non_blank(&spec.user) {
        body.user = Some(user.to_string());
    }

    if let Some(add_host) = non_blank(&spec.add_host) {
        host_config.extra_hosts = Some(split_items(add_host));
    }
    if let Some(dns) = non_blank(&spec.dns) {
        host_config.dns = Some(split_items(dns));
    }
    if let Some(dns_search) = non_blank(&spec.dns_search) {
        host_config.dns_search = Some(split_items(dns_search));
    }
    if let Some(env) = non_blank(&spec.environment) {
        body.env = Some(split_items(env));
    }

    // Ports: one exposed entry per token, one binding when a host part exists.
    let mut exposed_ports: Vec<String> = Vec::new();
    let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
    if let Some(ports) = non_blank(&spec.ports) {
        for mapping in parse_ports(ports)? {
            let port_key = format!("{}/tcp", mapping.container_port);
            if let Some(host_port) = mapping.host_port {
                let binding = PortBinding {
                    host_ip: None,
                    host_port: Some(host_port.to_string()),
                };
                match port_bindings.entry(port_key.clone()) {
                    Entry::Occupied(mut entry) => {
                        if let Some(bindings) = entry.get_mut() {
                            bindings.push(binding);
                        }
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(Some(vec![binding]));
                    }
                }
            }
            if !exposed_ports.contains(&port_key) {
                exposed_ports.push(port_key);
            }
        }
    }
    if exposed_ports.is_empty() {
        tracing::warn!(container = %spec.name, "no exposed or binding ports defined");
    } else {
        body.exposed_ports = Some(exposed_ports);
    }
    if !port_bindings.is_empty() {
        host_config.port_bindings = Some(port_bindings);
    }

    let stripped_name = strip_whitespace(&spec.name);
    let name = (!stripped_name.is_empty()).then_some(stripped_name);

    if let Some(net) = non_blank(&spec.net) {
        host_config.network_mode = Some(strip_whitespace(net));
    }

    if spec.privileged {
        host_config.privileged = Some(true);
    }
    if spec.publish_all {
        host_config.publish_all_ports = Some(true);
    }
    if spec.read_only {
        host_config.readonly_rootfs = Some(true);
    }
    if spec.stdin_open {
        body.open_stdin = Some(true);
    }
    if spec.tty {
        body.tty = Some(true);
    }

    // Anonymous volume declarations; bind destinations join them below.
    let mut volume_decls: Vec<String> = Vec::new();
    if let Some(volumes) = non_blank(&spec.volumes) {
        volume_decls.extend(split_items(volumes));
    }

    let lxc_conf = match non_blank(&spec.lxc_conf) {
        Some(raw) => parse_lxc_conf(raw)?,
        None => Vec::new(),
    };

    if let Some(entrypoint) = non_blank(&spec.entrypoint) {
        body.entrypoint = Some(entrypoint.split(',').map(str::to_string).collect());
    }

    if let Some(restart) = non_blank(&spec.restart) {
        host_config.restart_policy = Some(parse_restart_policy(restart)?);
    }

    if let Some(pid) = non_blank(&spec.pid) {
        host_config.pid_mode = Some(strip_whitespace(pid));
    }
    if let Some(dir) = non_blank(&spec.working_dir) {
        body.working_dir = Some(strip_whitespace(dir));
    }

    if let Some(cap_add) = non_blank(&spec.cap_add) {
        host_config.cap_add = Some(split_items(cap_add));
    }
    if let Some(cap_drop) = non_blank(&spec.cap_drop) {
        host_config.cap_drop = Some(split_items(cap_drop));
    }

    // Linked volumes: containers contribute volumes-from entries, host paths
    // contribute a volume declaration plus a bind when both sides are given.
    let mut volumes_from: Vec<String> = Vec::new();
    let mut binds: Vec<String> = Vec::new();
    for mount in &spec.mounts {
        match mount {
            VolumeSource::Container { name } => volumes_from.push(name.clone()),
            VolumeSource::HostPath {
                source,
                destination,
            } => {
                let has_source = !source.trim().is_empty();
                let has_destination = !destination.trim().is_empty();
                if has_destination && !volume_decls.contains(destination) {
                    volume_decls.push(destination.clone());
                }
                if has_source && has_destination {
                    binds.push(format!("{}:{}", source, destination));
                }
            }
        }
    }
    if !volumes_from.is_empty() {
        host_config.volumes_from = Some(volumes_from);
    }
    if !binds.is_empty() {
        host_config.binds = Some(binds);
    }
    if !volume_decls.is_empty() {
        body.volumes = Some(volume_decls);
    }

    // Links, deduplicated preserving first occurrence, aliased so the target
    // resolves inside this container as `<thisName>LinkTo<targetName>`.
    if let Some(deps) = deps {
        let targets = deps.targets(&spec.name);
        if !targets.is_empty() {
            let this_name = name.as_deref().unwrap_or(&spec.name);
            let links = targets
                .iter()
                .map(|target| format!("{}:{}LinkTo{}", target, this_name, target))
                .collect();
            host_config.links = Some(links);
        }
    }

    body.host_config = Some(host_config);

    Ok(CreateRequest {
        name,
        body,
        lxc_conf,
    })
}

/// The source model treats blank strings as absent.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

pub(crate) fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split a `;`-joined attribute into its entries, dropping empty segments.
fn split_items(raw: &str) -> Vec<String> {
    raw.split(';')
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-separated command tokens, trimmed, empties dropped.
fn command_tokens(command: &str) -> Vec<String> {
    command
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// One parsed `containerPort[:hostPort]` token. The left side is the exposed
/// container port, as in the source model; this is not the CLI's host-first
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PortMapping {
    container_port: u16,
    host_port: Option<u16>,
}

fn parse_ports(ports: &str) -> Result<Vec<PortMapping>, DockerError> {
    let mut mappings = Vec::new();
    for token in ports.split(';').filter(|t| !t.trim().is_empty()) {
        let (container_part, host_part) = match token.split_once(':') {
            Some((left, right)) => (left, Some(right)),
            None => (token, None),
        };

        let container_part = container_part.replace("/tcp", "");
        let container_port = container_part.parse::<u16>().map_err(|_| {
            DockerError::validation(format!("invalid container port: {}", token))
        })?;

        let host_port = match host_part {
            None => None,
            Some(raw) if raw.trim().is_empty() => Some(FALLBACK_HOST_PORT),
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
                DockerError::validation(format!("invalid host port: {}", token))
            })?),
        };

        mappings.push(PortMapping {
            container_port,
            host_port,
        });
    }
    Ok(mappings)
}

/// `key:value` pairs joined by `;`. A pair without exactly one `:` fails the
/// whole translation.
fn parse_lxc_conf(raw: &str) -> Result<Vec<(String, String)>, DockerError> {
    let mut pairs = Vec::new();
    for entry in raw.split(';').filter(|e| !e.trim().is_empty()) {
        let parts: Vec<&str> = entry.split(':').collect();
        if parts.len() != 2 {
            return Err(DockerError::validation(
                "Lxc conf format must be like this one --> key:value",
            ));
        }
        pairs.push((parts[0].to_string(), parts[1].to_string()));
    }
    Ok(pairs)
}

fn parse_restart_policy(raw: &str) -> Result<bollard::models::RestartPolicy, DockerError> {
    let policy: RestartPolicy = strip_whitespace(raw)
        .parse()
        .map_err(DockerError::validation)?;

    let name = match &policy {
        RestartPolicy::No => RestartPolicyNameEnum::NO,
        RestartPolicy::Always => RestartPolicyNameEnum::ALWAYS,
        RestartPolicy::UnlessStopped => RestartPolicyNameEnum::UNLESS_STOPPED,
        RestartPolicy::OnFailure { .. } => RestartPolicyNameEnum::ON_FAILURE,
    };
    let maximum_retry_count = match &policy {
        RestartPolicy::OnFailure { max_retries } => max_retries.map(|r| r as i64),
        _ => None,
    };

    Ok(bollard::models::RestartPolicy {
        name: Some(name),
        maximum_retry_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::DockerErrorKind;
    use crate::model::ContainerSpec;
    use proptest::prelude::*;

    fn spec(name: &str) -> ContainerSpec {
        ContainerSpec::named(name)
    }

    fn host_config(request: &CreateRequest) -> &HostConfig {
        request.body.host_config.as_ref().unwrap()
    }

    #[test]
    fn blank_image_and_command_fall_back_to_keepalive() {
        let request = build_create_request(&spec("idle"), None).unwrap();
        assert_eq!(request.body.image.as_deref(), Some(DEFAULT_IMAGE));
        assert_eq!(
            request.body.cmd,
            Some(vec!["sleep".to_string(), "9999".to_string()])
        );
    }

    #[test]
    fn image_is_trimmed_and_suppresses_the_keepalive_command() {
        let mut s = spec("web");
        s.image = Some("  nginx  ".to_string());
        let request = build_create_request(&s, None).unwrap();
        assert_eq!(request.body.image.as_deref(), Some("nginx"));
        assert!(request.body.cmd.is_none());
    }

    #[test]
    fn command_tokens_split_on_commas_and_trim() {
        let mut s = spec("job");
        s.command = Some("echo , hello,world ".to_string());
        let request = build_create_request(&s, None).unwrap();
        assert_eq!(
            request.body.cmd,
            Some(vec![
                "echo".to_string(),
                "hello".to_string(),
                "world".to_string()
            ])
        );
        // A command alone still defaults the image.
        assert_eq!(request.body.image.as_deref(), Some(DEFAULT_IMAGE));
    }

    #[test]
    fn port_string_yields_one_exposure_and_binding_per_token() {
        let mut s = spec("web");
        s.ports = Some("8080:80;4043:443".to_string());
        let request = build_create_request(&s, None).unwrap();

        let exposed = request.body.exposed_ports.as_ref().unwrap();
        assert_eq!(exposed, &vec!["8080/tcp".to_string(), "4043/tcp".to_string()]);

        let bindings = host_config(&request).port_bindings.as_ref().unwrap();
        assert_eq!(bindings.len(), 2);
        let b8080 = bindings["8080/tcp"].as_ref().unwrap();
        assert_eq!(b8080[0].host_port.as_deref(), Some("80"));
        let b4043 = bindings["4043/tcp"].as_ref().unwrap();
        assert_eq!(b4043[0].host_port.as_deref(), Some("443"));
    }

    #[test]
    fn blank_host_part_binds_the_fallback_constant() {
        // Regression pin: the source hard-codes 32768 instead of asking the
        // daemon for a free port. Changing this is a behavior change.
        let mut s = spec("web");
        s.ports = Some("80:".to_string());
        let request = build_create_request(&s, None).unwrap();

        let bindings = host_config(&request).port_bindings.as_ref().unwrap();
        let bound = bindings["80/tcp"].as_ref().unwrap();
        assert_eq!(
            bound[0].host_port.as_deref(),
            Some(FALLBACK_HOST_PORT.to_string().as_str())
        );
    }

    #[test]
    fn token_without_separator_exposes_without_binding() {
        let mut s = spec("web");
        s.ports = Some("9090".to_string());
        let request = build_create_request(&s, None).unwrap();

        assert_eq!(
            request.body.exposed_ports,
            Some(vec!["9090/tcp".to_string()])
        );
        assert!(host_config(&request).port_bindings.is_none());
    }

    #[test]
    fn tcp_suffix_on_the_container_port_is_stripped() {
        let mut s = spec("web");
        s.ports = Some("80/tcp:8080".to_string());
        let request = build_create_request(&s, None).unwrap();

        assert_eq!(request.body.exposed_ports, Some(vec!["80/tcp".to_string()]));
        let bindings = host_config(&request).port_bindings.as_ref().unwrap();
        assert_eq!(
            bindings["80/tcp"].as_ref().unwrap()[0].host_port.as_deref(),
            Some("8080")
        );
    }

    #[test]
    fn non_numeric_port_fails_validation() {
        let mut s = spec("web");
        s.ports = Some("http:80".to_string());
        let err = build_create_request(&s, None).unwrap_err();
        assert_eq!(err.kind(), DockerErrorKind::Validation);
    }

    #[test]
    fn lxc_entry_without_colon_fails_with_the_exact_message() {
        let mut s = spec("web");
        s.lxc_conf = Some("lxc.aa_profile".to_string());
        let err = build_create_request(&s, None).unwrap_err();
        assert_eq!(err.kind(), DockerErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "Lxc conf format must be like this one --> key:value"
        );
    }

    #[test]
    fn lxc_pairs_parse_into_key_value_tuples() {
        let mut s = spec("web");
        s.lxc_conf = Some("lxc.aa_profile:unconfined".to_string());
        let request = build_create_request(&s, None).unwrap();
        assert_eq!(
            request.lxc_conf,
            vec![("lxc.aa_profile".to_string(), "unconfined".to_string())]
        );
    }

    #[test]
    fn resources_apply_only_when_positive() {
        let mut s = spec("db");
        s.cpu_shares = Some(0);
        s.mem_limit = Some(-1);
        s.memory_swap = Some(1_073_741_824);
        let request = build_create_request(&s, None).unwrap();

        let hc = host_config(&request);
        assert!(hc.cpu_shares.is_none());
        assert!(hc.memory.is_none());
        assert_eq!(hc.memory_swap, Some(1_073_741_824));

        let mut s = spec("db");
        s.cpu_shares = Some(512);
        s.mem_limit = Some(536_870_912);
        s.cpuset_cpus = Some("0-3".to_string());
        s.cpuset_mems = Some("0".to_string());
        let request = build_create_request(&s, None).unwrap();

        let hc = host_config(&request);
        assert_eq!(hc.cpu_shares, Some(512));
        assert_eq!(hc.memory, Some(536_870_912));
        assert_eq!(hc.cpuset_cpus.as_deref(), Some("0-3"));
        assert_eq!(hc.cpuset_mems.as_deref(), Some("0"));
    }

    #[test]
    fn whitespace_is_stripped_from_identity_fields() {
        let mut s = spec("my app");
        s.hostname = Some("web 01".to_string());
        s.net = Some("bri dge".to_string());
        s.pid = Some(" host ".to_string());
        s.working_dir = Some("/srv/a pp".to_string());
        let request = build_create_request(&s, None).unwrap();

        assert_eq!(request.name.as_deref(), Some("myapp"));
        assert_eq!(request.body.hostname.as_deref(), Some("web01"));
        assert_eq!(request.body.working_dir.as_deref(), Some("/srv/app"));
        let hc = host_config(&request);
        assert_eq!(hc.network_mode.as_deref(), Some("bridge"));
        assert_eq!(hc.pid_mode.as_deref(), Some("host"));
    }

    #[test]
    fn semicolon_lists_split_into_entries() {
        let mut s = spec("app");
        s.environment = Some("A=1;B=two words".to_string());
        s.dns = Some("8.8.8.8;1.1.1.1".to_string());
        s.dns_search = Some("corp.example".to_string());
        s.add_host = Some("db:10.0.0.5;cache:10.0.0.6".to_string());
        s.cap_add = Some("NET_ADMIN;SYS_TIME".to_string());
        s.cap_drop = Some("MKNOD".to_string());
        let request = build_create_request(&s, None).unwrap();

        assert_eq!(
            request.body.env,
            Some(vec!["A=1".to_string(), "B=two words".to_string()])
        );
        let hc = host_config(&request);
        assert_eq!(
            hc.dns,
            Some(vec!["8.8.8.8".to_string(), "1.1.1.1".to_string()])
        );
        assert_eq!(hc.dns_search, Some(vec!["corp.example".to_string()]));
        assert_eq!(
            hc.extra_hosts,
            Some(vec!["db:10.0.0.5".to_string(), "cache:10.0.0.6".to_string()])
        );
        assert_eq!(
            hc.cap_add,
            Some(vec!["NET_ADMIN".to_string(), "SYS_TIME".to_string()])
        );
        assert_eq!(hc.cap_drop, Some(vec!["MKNOD".to_string()]));
    }

    #[test]
    fn links_deduplicate_preserving_order_and_carry_aliases() {
        let mut deps = DependencyGraph::new();
        deps.link("web", "db");
        deps.link("web", "cache");
        deps.link("web", "db");

        let request = build_create_request(&spec("web"), Some(&deps)).unwrap();
        assert_eq!(
            host_config(&request).links,
            Some(vec![
                "db:webLinkTodb".to_string(),
                "cache:webLinkTocache".to_string()
            ])
        );
    }

    #[test]
    fn no_link_targets_leaves_links_unset() {
        let deps = DependencyGraph::new();
        let request = build_create_request(&spec("web"), Some(&deps)).unwrap();
        assert!(host_config(&request).links.is_none());
    }

    #[test]
    fn mounts_split_into_volumes_from_and_binds() {
        let mut s = spec("app");
        s.mounts = vec![
            VolumeSource::Container {
                name: "data".to_string(),
            },
            VolumeSource::HostPath {
                source: "/srv/app".to_string(),
                destination: "/data".to_string(),
            },
            VolumeSource::HostPath {
                source: String::new(),
                destination: "/scratch".to_string(),
            },
            VolumeSource::HostPath {
                source: "/orphan".to_string(),
                destination: String::new(),
            },
        ];
        let request = build_create_request(&s, None).unwrap();

        let hc = host_config(&request);
        assert_eq!(hc.volumes_from, Some(vec!["data".to_string()]));
        assert_eq!(hc.binds, Some(vec!["/srv/app:/data".to_string()]));
        // Destination-only entries become volume declarations, blank
        // destinations are dropped entirely.
        assert_eq!(
            request.body.volumes,
            Some(vec!["/data".to_string(), "/scratch".to_string()])
        );
    }

    #[test]
    fn anonymous_volumes_come_from_the_semicolon_list() {
        let mut s = spec("app");
        s.volumes = Some("/data;/logs".to_string());
        let request = build_create_request(&s, None).unwrap();
        assert_eq!(
            request.body.volumes,
            Some(vec!["/data".to_string(), "/logs".to_string()])
        );
    }

    #[test]
    fn restart_policy_parses_with_whitespace_stripped() {
        let mut s = spec("app");
        s.restart = Some(" on-failure:3 ".to_string());
        let request = build_create_request(&s, None).unwrap();

        let policy = host_config(&request).restart_policy.as_ref().unwrap();
        assert_eq!(policy.name, Some(RestartPolicyNameEnum::ON_FAILURE));
        assert_eq!(policy.maximum_retry_count, Some(3));

        let mut s = spec("app");
        s.restart = Some("whenever".to_string());
        let err = build_create_request(&s, None).unwrap_err();
        assert_eq!(err.kind(), DockerErrorKind::Validation);
    }

    #[test]
    fn entrypoint_splits_on_commas_verbatim() {
        let mut s = spec("app");
        s.entrypoint = Some("/bin/sh,-c".to_string());
        let request = build_create_request(&s, None).unwrap();
        assert_eq!(
            request.body.entrypoint,
            Some(vec!["/bin/sh".to_string(), "-c".to_string()])
        );
    }

    #[test]
    fn flags_are_set_only_when_true() {
        let request = build_create_request(&spec("plain"), None).unwrap();
        let hc = host_config(&request);
        assert!(hc.privileged.is_none());
        assert!(hc.publish_all_ports.is_none());
        assert!(hc.readonly_rootfs.is_none());
        assert!(request.body.open_stdin.is_none());
        assert!(request.body.tty.is_none());

        let mut s = spec("loud");
        s.privileged = true;
        s.publish_all = true;
        s.read_only = true;
        s.stdin_open = true;
        s.tty = true;
        let request = build_create_request(&s, None).unwrap();
        let hc = host_config(&request);
        assert_eq!(hc.privileged, Some(true));
        assert_eq!(hc.publish_all_ports, Some(true));
        assert_eq!(hc.readonly_rootfs, Some(true));
        assert_eq!(request.body.open_stdin, Some(true));
        assert_eq!(request.body.tty, Some(true));
    }

    #[test]
    fn user_and_domain_apply_verbatim_when_non_blank() {
        let mut s = spec("app");
        s.user = Some("svc".to_string());
        s.domain_name = Some("internal.example".to_string());
        let request = build_create_request(&s, None).unwrap();
        assert_eq!(request.body.user.as_deref(), Some("svc"));
        assert_eq!(request.body.domainname.as_deref(), Some("internal.example"));
    }

    proptest! {
        #[test]
        fn port_parsing_never_panics(input in ".{0,64}") {
            let mut s = spec("fuzz");
            s.ports = Some(input);
            let _ = build_create_request(&s, None);
        }

        #[test]
        fn every_valid_pair_produces_one_exposure_and_binding(
            pairs in proptest::collection::vec((1u16..=65535, 1u16..=65535), 1..8)
        ) {
            let joined = pairs
                .iter()
                .map(|(c, h)| format!("{}:{}", c, h))
                .collect::<Vec<_>>()
                .join(";");
            let mut s = spec("fuzz");
            s.ports = Some(joined);
            let request = build_create_request(&s, None).unwrap();

            let distinct: std::collections::HashSet<u16> =
                pairs.iter().map(|(c, _)| *c).collect();
            let exposed = request.body.exposed_ports.unwrap();
            prop_assert_eq!(exposed.len(), distinct.len());
            let bindings = request.body.host_config.unwrap().port_bindings.unwrap();
            prop_assert_eq!(bindings.len(), distinct.len());
        }
    }
}
