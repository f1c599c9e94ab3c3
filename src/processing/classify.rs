//! Public/private classification of subnets.
//!
//! A route table is public when it sends `0.0.0.0/0` to an internet gateway.
//! Subnets take the class of their explicitly associated table, or of the
//! VPC's main table when they have no association.

use super::Diagnostic;
use crate::models::{Network, Reachability, Route, RouteTable, Subnet, DEFAULT_ROUTE};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Regex for route target ids, e.g. `igw-0a1b2c3d` or `pcx-1234`.
static GATEWAY_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_gateway_regex() -> &'static Regex {
    GATEWAY_REGEX
        .get_or_init(|| Regex::new(r"^([a-z]+)-([0-9A-Za-z]+)$").expect("Invalid Regex"))
}

/// Parsed route target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayRef {
    /// Traffic stays inside the VPC.
    Local,
    InternetGateway(String),
    NatGateway(String),
    /// Peering, transit gateway, egress-only gateway, instance, ...
    Other { prefix: String, id: String },
}

impl GatewayRef {
    /// Parse a route target id. Returns `None` when the id is malformed.
    pub fn parse(gateway: &str) -> Option<GatewayRef> {
        let gateway = gateway.trim();
        if gateway == "local" {
            return Some(GatewayRef::Local);
        }
        let caps = get_gateway_regex().captures(gateway)?;
        let prefix = &caps[1];
        let id = gateway.to_string();
        Some(match prefix {
            "igw" => GatewayRef::InternetGateway(id),
            "nat" => GatewayRef::NatGateway(id),
            _ => GatewayRef::Other {
                prefix: prefix.to_string(),
                id,
            },
        })
    }

    pub fn is_internet_gateway(&self) -> bool {
        matches!(self, GatewayRef::InternetGateway(_))
    }
}

/// True if the route sends the default route to an internet gateway.
pub fn is_internet_route(route: &Route) -> bool {
    let default_route = route.destination.as_deref().map(str::trim) == Some(DEFAULT_ROUTE);
    default_route
        && route
            .gateway
            .as_deref()
            .and_then(GatewayRef::parse)
            .map(|g| g.is_internet_gateway())
            .unwrap_or(false)
}

/// True if any route of the table makes it public.
pub fn is_public_route_table(table: &RouteTable) -> bool {
    table.routes.iter().any(is_internet_route)
}

/// Check every route, reporting malformed targets along the way.
fn scan_routes(table: &RouteTable, diagnostics: &mut Vec<Diagnostic>) -> bool {
    let mut is_public = false;
    for route in &table.routes {
        let gateway = match route.gateway.as_deref().map(str::trim) {
            Some(g) if !g.is_empty() => g,
            _ => continue,
        };
        if GatewayRef::parse(gateway).is_none() {
            diagnostics.push(Diagnostic::MalformedGateway {
                route_table_id: table.id.clone(),
                gateway: gateway.to_string(),
            });
            continue;
        }
        if is_internet_route(route) {
            is_public = true;
        }
    }
    is_public
}

/// Result of [`classify_network`]: one class per subnet id plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub network_id: String,
    classes: HashMap<String, Reachability>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Classification {
    /// Class of a subnet, `None` if the subnet was not part of the input.
    pub fn get(&self, subnet_id: &str) -> Option<Reachability> {
        self.classes.get(subnet_id).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Count of subnets per class: (public, private, implicit).
    pub fn counts(&self) -> (usize, usize, usize) {
        self.classes
            .values()
            .fold((0, 0, 0), |(public, private, implicit), class| match class {
                Reachability::Public => (public + 1, private, implicit),
                Reachability::Private => (public, private + 1, implicit),
                Reachability::PrivateImplicit => (public, private, implicit + 1),
            })
    }

    /// Pair each subnet with its class, keeping the input order.
    pub fn classified<'a>(&self, subnets: &'a [Subnet]) -> Vec<ClassifiedSubnet<'a>> {
        subnets
            .iter()
            .map(|subnet| ClassifiedSubnet {
                subnet,
                class: self.get(&subnet.id).unwrap_or(Reachability::PrivateImplicit),
            })
            .collect()
    }
}

/// A subnet together with its computed class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedSubnet<'a> {
    pub subnet: &'a Subnet,
    pub class: Reachability,
}

/// Classify every subnet of a VPC from its route tables.
///
/// The result has exactly one entry per distinct subnet id. Inconsistent
/// input never fails the call; the offending record is skipped and reported
/// in [`Classification::diagnostics`].
pub fn classify_network(
    network: &Network,
    route_tables: &[RouteTable],
    subnets: &[Subnet],
) -> Classification {
    let mut diagnostics = Vec::new();
    let known_subnets: HashSet<&str> = subnets.iter().map(|s| s.id.as_str()).collect();

    // (route table id, is_public)
    let mut main_table: Option<(&str, bool)> = None;
    let mut explicit: HashMap<&str, (&str, bool)> = HashMap::new();

    for table in route_tables {
        if table.network_id != network.id {
            diagnostics.push(Diagnostic::ForeignRouteTable {
                route_table_id: table.id.clone(),
                network_id: table.network_id.clone(),
            });
            continue;
        }

        let is_public = scan_routes(table, &mut diagnostics);

        for association in &table.associations {
            if association.main {
                match main_table {
                    None => main_table = Some((table.id.as_str(), is_public)),
                    Some((kept, _)) if kept != table.id => {
                        diagnostics.push(Diagnostic::DuplicateMainTable {
                            route_table_id: table.id.clone(),
                            kept_route_table_id: kept.to_string(),
                        });
                    }
                    Some(_) => {}
                }
            } else if let Some(subnet_id) = association.subnet_id.as_deref() {
                if !known_subnets.contains(subnet_id) {
                    diagnostics.push(Diagnostic::UnknownSubnetAssociation {
                        route_table_id: table.id.clone(),
                        subnet_id: subnet_id.to_string(),
                    });
                    continue;
                }
                match explicit.get(subnet_id) {
                    None => {
                        explicit.insert(subnet_id, (table.id.as_str(), is_public));
                    }
                    Some((kept, _)) if *kept != table.id => {
                        diagnostics.push(Diagnostic::DuplicateSubnetAssociation {
                            subnet_id: subnet_id.to_string(),
                            route_table_id: table.id.clone(),
                            kept_route_table_id: kept.to_string(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
    }

    let mut classes = HashMap::new();
    let mut implicit_subnets = 0;
    for subnet in subnets {
        if classes.contains_key(&subnet.id) {
            continue;
        }
        if let Some(cidr) = subnet.cidr {
            if !network.cidrs.is_empty() && !network.covers(&cidr) {
                diagnostics.push(Diagnostic::SubnetOutsideNetwork {
                    subnet_id: subnet.id.clone(),
                    cidr: cidr.to_string(),
                });
            }
        }
        let class = match (explicit.get(subnet.id.as_str()), main_table) {
            (Some((_, is_public)), _) => Reachability::from(*is_public),
            (None, Some((_, is_public))) => Reachability::from(is_public),
            (None, None) => {
                implicit_subnets += 1;
                Reachability::PrivateImplicit
            }
        };
        classes.insert(subnet.id.clone(), class);
    }

    if implicit_subnets > 0 {
        diagnostics.push(Diagnostic::NoMainRouteTable {
            network_id: network.id.clone(),
            implicit_subnets,
        });
    }

    Classification {
        network_id: network.id.clone(),
        classes,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Association, Ipv4};

    fn vpc() -> Network {
        Network::new("vpc-1", "us-east-1", Ipv4::new("10.0.0.0/16").unwrap())
    }

    fn subnet(id: &str, cidr: &str) -> Subnet {
        Subnet::new(id, "vpc-1", Some(Ipv4::new(cidr).unwrap()), "us-east-1a")
    }

    #[test]
    fn test_gateway_ref_parse() {
        assert_eq!(
            GatewayRef::parse("igw-0123"),
            Some(GatewayRef::InternetGateway("igw-0123".to_string()))
        );
        assert_eq!(
            GatewayRef::parse("nat-0123"),
            Some(GatewayRef::NatGateway("nat-0123".to_string()))
        );
        assert_eq!(GatewayRef::parse("local"), Some(GatewayRef::Local));
        assert!(matches!(
            GatewayRef::parse("eigw-0a1b"),
            Some(GatewayRef::Other { ref prefix, .. }) if prefix == "eigw"
        ));
        assert_eq!(GatewayRef::parse("igw-"), None);
        assert_eq!(GatewayRef::parse("igw_0123"), None);
        assert_eq!(GatewayRef::parse("igw-01 23"), None);
    }

    #[test]
    fn test_nat_route_is_not_public() {
        let nat = RouteTable::new("rtb-1", "vpc-1").with_route("0.0.0.0/0", "nat-0123");
        assert!(!is_public_route_table(&nat));
        let igw = RouteTable::new("rtb-2", "vpc-1").with_route("0.0.0.0/0", "igw-0123");
        assert!(is_public_route_table(&igw));
    }

    #[test]
    fn test_igw_route_needs_default_destination() {
        let table = RouteTable::new("rtb-1", "vpc-1")
            .with_route("10.0.0.0/16", "local")
            .with_route("192.168.0.0/16", "igw-0123");
        assert!(!is_public_route_table(&table));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let main = RouteTable::new("rtb-main", "vpc-1")
            .with_route("10.0.0.0/16", "local")
            .with_association(Association::main());
        let public = RouteTable::new("rtb-pub", "vpc-1")
            .with_route("10.0.0.0/16", "local")
            .with_route("0.0.0.0/0", "igw-1")
            .with_association(Association::subnet("subnet-a"));
        let subnets = vec![
            subnet("subnet-a", "10.0.1.0/24"),
            subnet("subnet-b", "10.0.2.0/24"),
        ];

        let result = classify_network(&vpc(), &[main, public], &subnets);

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("subnet-a"), Some(Reachability::Public));
        assert_eq!(result.get("subnet-b"), Some(Reachability::Private));
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_explicit_association_beats_main() {
        let main = RouteTable::new("rtb-main", "vpc-1")
            .with_route("0.0.0.0/0", "igw-1")
            .with_association(Association::main());
        let private = RouteTable::new("rtb-priv", "vpc-1")
            .with_route("0.0.0.0/0", "nat-1")
            .with_association(Association::subnet("subnet-a"));
        let subnets = vec![
            subnet("subnet-a", "10.0.1.0/24"),
            subnet("subnet-b", "10.0.2.0/24"),
        ];

        // Table order must not matter.
        let result = classify_network(&vpc(), &[private.clone(), main.clone()], &subnets);
        assert_eq!(result.get("subnet-a"), Some(Reachability::Private));
        assert_eq!(result.get("subnet-b"), Some(Reachability::Public));

        let result = classify_network(&vpc(), &[main, private], &subnets);
        assert_eq!(result.get("subnet-a"), Some(Reachability::Private));
        assert_eq!(result.get("subnet-b"), Some(Reachability::Public));
    }

    #[test]
    fn test_no_main_table_is_private_implicit() {
        let public = RouteTable::new("rtb-pub", "vpc-1")
            .with_route("0.0.0.0/0", "igw-1")
            .with_association(Association::subnet("subnet-a"));
        let subnets = vec![
            subnet("subnet-a", "10.0.1.0/24"),
            subnet("subnet-b", "10.0.2.0/24"),
            subnet("subnet-c", "10.0.3.0/24"),
        ];

        let result = classify_network(&vpc(), &[public], &subnets);

        assert_eq!(result.get("subnet-a"), Some(Reachability::Public));
        assert_eq!(result.get("subnet-b"), Some(Reachability::PrivateImplicit));
        assert_eq!(result.get("subnet-c"), Some(Reachability::PrivateImplicit));
        assert_eq!(result.counts(), (1, 0, 2));
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::NoMainRouteTable {
                network_id: "vpc-1".to_string(),
                implicit_subnets: 2
            }]
        );
        assert_eq!(result.diagnostics[0].condition(), "AmbiguousDefault");
    }

    #[test]
    fn test_no_route_tables_at_all() {
        let subnets = vec![subnet("subnet-a", "10.0.1.0/24")];
        let result = classify_network(&vpc(), &[], &subnets);
        assert_eq!(result.get("subnet-a"), Some(Reachability::PrivateImplicit));
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_totality_on_empty_input() {
        let result = classify_network(&vpc(), &[], &[]);
        assert!(result.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_input_is_skipped_and_reported() {
        let main = RouteTable::new("rtb-main", "vpc-1")
            .with_route("0.0.0.0/0", "igw_broken")
            .with_association(Association::main())
            .with_association(Association::subnet("subnet-zzz"));
        let foreign = RouteTable::new("rtb-other", "vpc-2")
            .with_route("0.0.0.0/0", "igw-1")
            .with_association(Association::subnet("subnet-a"));
        let subnets = vec![subnet("subnet-a", "10.0.1.0/24")];

        let result = classify_network(&vpc(), &[main, foreign], &subnets);

        assert_eq!(result.get("subnet-a"), Some(Reachability::Private));
        assert_eq!(
            result.diagnostics,
            vec![
                Diagnostic::MalformedGateway {
                    route_table_id: "rtb-main".to_string(),
                    gateway: "igw_broken".to_string()
                },
                Diagnostic::UnknownSubnetAssociation {
                    route_table_id: "rtb-main".to_string(),
                    subnet_id: "subnet-zzz".to_string()
                },
                Diagnostic::ForeignRouteTable {
                    route_table_id: "rtb-other".to_string(),
                    network_id: "vpc-2".to_string()
                },
            ]
        );
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.condition() == "MalformedInput"));
    }

    #[test]
    fn test_duplicate_main_and_association_keep_first() {
        let first = RouteTable::new("rtb-1", "vpc-1")
            .with_route("0.0.0.0/0", "igw-1")
            .with_association(Association::main())
            .with_association(Association::subnet("subnet-a"));
        let second = RouteTable::new("rtb-2", "vpc-1")
            .with_association(Association::main())
            .with_association(Association::subnet("subnet-a"));
        let subnets = vec![
            subnet("subnet-a", "10.0.1.0/24"),
            subnet("subnet-b", "10.0.2.0/24"),
        ];

        let result = classify_network(&vpc(), &[first, second], &subnets);

        assert_eq!(result.get("subnet-a"), Some(Reachability::Public));
        assert_eq!(result.get("subnet-b"), Some(Reachability::Public));
        assert_eq!(result.diagnostics.len(), 2);
    }

    #[test]
    fn test_subnet_outside_network_is_reported() {
        let main = RouteTable::new("rtb-main", "vpc-1").with_association(Association::main());
        let subnets = vec![subnet("subnet-x", "172.16.0.0/24")];
        let result = classify_network(&vpc(), &[main], &subnets);
        assert_eq!(result.get("subnet-x"), Some(Reachability::Private));
        assert_eq!(result.diagnostics[0].subject(), "subnet-x");
    }

    #[test]
    fn test_classified_keeps_input_order() {
        let main = RouteTable::new("rtb-main", "vpc-1").with_association(Association::main());
        let subnets = vec![
            subnet("subnet-c", "10.0.3.0/24"),
            subnet("subnet-a", "10.0.1.0/24"),
        ];
        let result = classify_network(&vpc(), &[main], &subnets);
        let ids: Vec<&str> = result
            .classified(&subnets)
            .iter()
            .map(|c| c.subnet.id.as_str())
            .collect();
        assert_eq!(ids, vec!["subnet-c", "subnet-a"]);
    }
}
