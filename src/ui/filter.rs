use crate::model::Server;

/// Returns the indices of servers matching the live filter. Matching is a
/// case-insensitive substring test over the composite key name + host + group.
pub fn filter_servers(servers: &[Server], filter: &str) -> Vec<usize> {
    if filter.trim().is_empty() {
        return (0..servers.len()).collect();
    }

    let needle = filter.to_lowercase();
    servers
        .iter()
        .enumerate()
        .filter(|(_, server)| server_matches(server, &needle))
        .map(|(index, _)| index)
        .collect()
}

fn server_matches(server: &Server, needle: &str) -> bool {
    server.name.to_lowercase().contains(needle)
        || server.host.to_lowercase().contains(needle)
        || server.group.to_lowercase().contains(needle)
}
