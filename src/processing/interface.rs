//! Work out what a network interface belongs to.
//!
//! Interfaces created by managed services carry a telling description,
//! e.g. `RDSNetworkInterface` or `AWS Lambda VPC ENI-my-function`.

/// Description fragments and the resource type they identify. First match wins.
const DESCRIPTION_RULES: &[(&[&str], &str)] = &[
    (&["rds"], "RDS Instance"),
    (&["lambda"], "Lambda Function"),
    (&["elb", "load balancer"], "Load Balancer"),
    (&["ecs"], "Elastic Container Service"),
    (&["nat gateway"], "NAT Gateway"),
    (&["eks"], "Elastic Kubernetes Service"),
    (&["route53"], "Route 53 Resolver"),
    (&["efs"], "Elastic File System"),
];

/// Type label used when neither description nor attachment says anything.
pub const UNKNOWN_INTERFACE: &str = "Unknown Interface";

/// Infer the resource type behind an interface.
///
/// A known service in the description wins over an instance attachment, so
/// an ECS task on EC2 is reported as ECS rather than as the host instance.
pub fn infer_interface_type(description: &str, attached_instance: Option<&str>) -> String {
    let lowered = description.to_lowercase();
    for (needles, label) in DESCRIPTION_RULES {
        if needles.iter().any(|needle| lowered.contains(needle)) {
            return label.to_string();
        }
    }
    if attached_instance.map(|i| !i.is_empty()).unwrap_or(false) {
        return "EC2 Instance".to_string();
    }
    if lowered.trim().is_empty() {
        UNKNOWN_INTERFACE.to_string()
    } else {
        lowered.trim().to_string()
    }
}
