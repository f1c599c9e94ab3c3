//! Regional services and global resources, described as data.
//!
//! Each [`ServiceScan`] names one CLI command, where its items live in the
//! JSON response, and which fields end up in the `Details` column.

use crate::models::ServiceRecord;
use serde_json::Value;

/// Region label used for account-wide resources.
pub const GLOBAL_REGION: &str = "Global";

/// One listing command and how to turn its response into records.
#[derive(Debug, Clone, Copy)]
pub struct ServiceScan {
    pub category: &'static str,
    pub service: &'static str,
    /// `<service> <operation> [args]`, without region or output flags.
    pub command: &'static str,
    /// JSON pointer to the item array.
    pub items: &'static str,
    /// JSON pointer to the name inside an item; `None` when items are plain strings.
    pub name: Option<&'static str>,
    /// `(label, pointer)` pairs rendered as `label: value`.
    pub details: &'static [(&'static str, &'static str)],
    /// Endpoint region forced for global APIs.
    pub region: Option<&'static str>,
}

pub const REGIONAL_SERVICES: &[ServiceScan] = &[
    ServiceScan {
        category: "Compute",
        service: "Auto Scaling Group",
        command: "autoscaling describe-auto-scaling-groups",
        items: "/AutoScalingGroups",
        name: Some("/AutoScalingGroupName"),
        details: &[
            ("Desired", "/DesiredCapacity"),
            ("Min", "/MinSize"),
            ("Max", "/MaxSize"),
        ],
        region: None,
    },
    ServiceScan {
        category: "Compute",
        service: "EKS Cluster",
        command: "eks list-clusters",
        items: "/clusters",
        name: None,
        details: &[],
        region: None,
    },
    ServiceScan {
        category: "Messaging",
        service: "SQS Queue",
        command: "sqs list-queues",
        items: "/QueueUrls",
        name: None,
        details: &[],
        region: None,
    },
    ServiceScan {
        category: "Messaging",
        service: "SNS Topic",
        command: "sns list-topics",
        items: "/Topics",
        name: Some("/TopicArn"),
        details: &[],
        region: None,
    },
    ServiceScan {
        category: "Messaging",
        service: "Amazon MQ Broker",
        command: "mq list-brokers",
        items: "/BrokerSummaries",
        name: Some("/BrokerName"),
        details: &[("ID", "/BrokerId"), ("Status", "/BrokerState")],
        region: None,
    },
    ServiceScan {
        category: "Database",
        service: "DynamoDB Table",
        command: "dynamodb list-tables",
        items: "/TableNames",
        name: None,
        details: &[],
        region: None,
    },
    ServiceScan {
        category: "Database",
        service: "ElastiCache Cluster",
        command: "elasticache describe-cache-clusters",
        items: "/CacheClusters",
        name: Some("/CacheClusterId"),
        details: &[("Engine", "/Engine"), ("Status", "/CacheClusterStatus")],
        region: None,
    },
    ServiceScan {
        category: "Container Registry",
        service: "ECR Repository",
        command: "ecr describe-repositories",
        items: "/repositories",
        name: Some("/repositoryName"),
        details: &[("ARN", "/repositoryArn")],
        region: None,
    },
    ServiceScan {
        category: "Firewall",
        service: "WAF Web ACL",
        command: "wafv2 list-web-acls --scope REGIONAL",
        items: "/WebACLs",
        name: Some("/Name"),
        details: &[("ID", "/Id")],
        region: None,
    },
];

pub const GLOBAL_SERVICES: &[ServiceScan] = &[
    ServiceScan {
        category: "Security",
        service: "IAM User",
        command: "iam list-users",
        items: "/Users",
        name: Some("/UserName"),
        details: &[("ID", "/UserId")],
        region: None,
    },
    ServiceScan {
        category: "Storage",
        service: "S3 Bucket",
        command: "s3api list-buckets",
        items: "/Buckets",
        name: Some("/Name"),
        details: &[("Creation Date", "/CreationDate")],
        region: None,
    },
    ServiceScan {
        category: "CDN",
        service: "CloudFront Distribution",
        command: "cloudfront list-distributions",
        items: "/DistributionList/Items",
        name: Some("/Id"),
        details: &[("Domain Name", "/DomainName"), ("Status", "/Status")],
        region: None,
    },
    ServiceScan {
        category: "DNS",
        service: "Route 53 Hosted Zone",
        command: "route53 list-hosted-zones",
        items: "/HostedZones",
        name: Some("/Name"),
        details: &[("ID", "/Id"), ("Private Zone", "/Config/PrivateZone")],
        region: None,
    },
    // Global Accelerator is only served from us-west-2.
    ServiceScan {
        category: "Networking",
        service: "Global Accelerator",
        command: "globalaccelerator list-accelerators",
        items: "/Accelerators",
        name: Some("/Name"),
        details: &[("DNS", "/DnsName"), ("Status", "/Status")],
        region: Some("us-west-2"),
    },
];

/// Display form of a JSON leaf; strings lose their quotes.
fn value_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Turn one listing response into records labelled with `region`.
///
/// A response without the item array (e.g. CloudFront with no
/// distributions) yields no records.
pub fn map_items(scan: &ServiceScan, region: &str, response: &Value) -> Vec<ServiceRecord> {
    let items = match response.pointer(scan.items).and_then(Value::as_array) {
        Some(items) => items,
        None => {
            log::debug!("{}: no items at {}", scan.service, scan.items);
            return vec![];
        }
    };

    items
        .iter()
        .map(|item| {
            let name = match scan.name {
                Some(pointer) => value_to_string(item.pointer(pointer)),
                None => value_to_string(Some(item)),
            };
            let details = if scan.details.is_empty() {
                "N/A".to_string()
            } else {
                scan.details
                    .iter()
                    .map(|(label, pointer)| {
                        format!("{label}: {}", value_to_string(item.pointer(pointer)))
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            ServiceRecord {
                region: region.to_string(),
                category: scan.category.to_string(),
                service: scan.service.to_string(),
                name,
                details,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scan_for(service: &str) -> &'static ServiceScan {
        REGIONAL_SERVICES
            .iter()
            .chain(GLOBAL_SERVICES)
            .find(|s| s.service == service)
            .unwrap()
    }

    #[test]
    fn test_map_plain_string_items() {
        let response = json!({"QueueUrls": [
            "https://sqs.us-east-1.amazonaws.com/123/orders",
            "https://sqs.us-east-1.amazonaws.com/123/refunds"
        ]});
        let records = map_items(scan_for("SQS Queue"), "us-east-1", &response);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "https://sqs.us-east-1.amazonaws.com/123/orders");
        assert_eq!(records[0].details, "N/A");
        assert_eq!(records[0].category, "Messaging");
        assert_eq!(records[1].region, "us-east-1");
    }

    #[test]
    fn test_map_details_with_numbers_and_nesting() {
        let response = json!({"AutoScalingGroups": [{
            "AutoScalingGroupName": "web-asg",
            "DesiredCapacity": 2, "MinSize": 1, "MaxSize": 4
        }]});
        let records = map_items(scan_for("Auto Scaling Group"), "eu-west-1", &response);
        assert_eq!(records[0].name, "web-asg");
        assert_eq!(records[0].details, "Desired: 2, Min: 1, Max: 4");

        let response = json!({"HostedZones": [{
            "Id": "/hostedzone/Z1", "Name": "example.com.",
            "Config": {"PrivateZone": false}
        }]});
        let records = map_items(scan_for("Route 53 Hosted Zone"), GLOBAL_REGION, &response);
        assert_eq!(records[0].details, "ID: /hostedzone/Z1, Private Zone: false");
        assert_eq!(records[0].region, "Global");
    }

    #[test]
    fn test_map_nested_items_and_missing_list() {
        let scan = scan_for("CloudFront Distribution");
        let response = json!({"DistributionList": {"Items": [
            {"Id": "E123", "DomainName": "d1.cloudfront.net", "Status": "Deployed"}
        ]}});
        let records = map_items(scan, GLOBAL_REGION, &response);
        assert_eq!(records[0].name, "E123");
        assert_eq!(
            records[0].details,
            "Domain Name: d1.cloudfront.net, Status: Deployed"
        );

        // No distributions: the CLI omits Items altogether.
        let empty = json!({"DistributionList": {"Quantity": 0}});
        assert!(map_items(scan, GLOBAL_REGION, &empty).is_empty());
        assert!(map_items(scan, GLOBAL_REGION, &json!({})).is_empty());
    }

    #[test]
    fn test_missing_fields_render_as_dash() {
        let response = json!({"BrokerSummaries": [{"BrokerName": "mq-1", "BrokerId": ""}]});
        let records = map_items(scan_for("Amazon MQ Broker"), "us-east-1", &response);
        assert_eq!(records[0].details, "ID: -, Status: -");
    }

    #[test]
    fn test_only_global_accelerator_forces_region() {
        assert!(REGIONAL_SERVICES.iter().all(|s| s.region.is_none()));
        let forced: Vec<&str> = GLOBAL_SERVICES
            .iter()
            .filter(|s| s.region.is_some())
            .map(|s| s.service)
            .collect();
        assert_eq!(forced, vec!["Global Accelerator"]);
    }
}
