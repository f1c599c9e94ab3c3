//! Integration tests for aws-topology-audit
//!
//! These tests verify the complete workflow from reading cache to writing the report.

use aws_topology_audit::{
    check_for_duplicate_ids,
    config::AuditConfig,
    get_scan_snapshot,
    models::{AttachedResource, Reachability, ResourceKind},
    output::{report_tables, CsvSink, ReportSink, XlsxSink},
    processing::{build_report, Diagnostic, RowKind},
};

const TEST_CACHE: &str = "src/tests/test_data/scan_test_cache_01.json";

fn cached_config() -> AuditConfig {
    AuditConfig {
        cache_file: Some(TEST_CACHE.to_string()),
        // Never reached: the cache file exists.
        aws_bin: "aws-binary-that-does-not-exist".to_string(),
        ..AuditConfig::default()
    }
}

#[test]
fn test_full_workflow_with_cache() {
    let snapshot = get_scan_snapshot(&cached_config()).expect("Failed to read scan cache");
    assert_eq!(snapshot.network_count(), 2);
    assert_eq!(snapshot.subnet_count(), 3);
    check_for_duplicate_ids(&snapshot).expect("Found unexpected duplicates");

    let report = build_report(&snapshot);

    assert_eq!(
        report.subnet_class("us-east-1", "subnet-a"),
        Some(Reachability::Public)
    );
    assert_eq!(
        report.subnet_class("us-east-1", "subnet-b"),
        Some(Reachability::Private)
    );
    assert_eq!(
        report.subnet_class("us-east-1", "subnet-c"),
        Some(Reachability::PrivateImplicit)
    );
    assert_eq!(report.class_counts(), (1, 1, 1));

    let diagnostics: Vec<&Diagnostic> = report.diagnostics.iter().map(|d| &d.diagnostic).collect();
    assert_eq!(
        diagnostics,
        vec![
            &Diagnostic::OrphanResource {
                resource_id: "i-3".to_string(),
                subnet_id: "subnet-gone".to_string(),
            },
            &Diagnostic::NoMainRouteTable {
                network_id: "vpc-2".to_string(),
                implicit_subnets: 1,
            },
        ]
    );
}

#[test]
fn test_topology_rows_from_cache() {
    let snapshot = get_scan_snapshot(&cached_config()).expect("Failed to read scan cache");
    let report = build_report(&snapshot);

    let vpc1 = &report.networks[0];
    let kinds: Vec<RowKind> = vpc1.rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RowKind::Subnet,
            RowKind::Subnet,
            RowKind::NoSubnet,
            RowKind::NoSubnet
        ]
    );

    // The interface of i-1 is represented by the instance itself.
    let a: Vec<&str> = vpc1.rows[0].resources.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(a, vec!["i-1", "resize-images", "web"]);
    let b: Vec<&str> = vpc1.rows[1].resources.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(b, vec!["i-2", "resize-images", "eni-2"]);
    assert_eq!(vpc1.rows[2].resources[0].id, "i-3");
    assert_eq!(vpc1.rows[3].resources[0].id, "orders-db");

    let vpc2 = &report.networks[1];
    assert_eq!(vpc2.rows.len(), 1);
    assert_eq!(vpc2.rows[0].resources[0].id, "i-9");
}

#[test]
fn test_tables_to_csv() {
    let snapshot = get_scan_snapshot(&cached_config()).expect("Failed to read scan cache");
    let report = build_report(&snapshot);
    let tables = report_tables(&report);

    assert_eq!(tables.len(), 9);
    assert_eq!(tables[0].len(), 5, "Expected 5 topology rows");
    assert_eq!(tables[1].len(), 4, "Expected 4 EC2 instances");
    assert_eq!(tables[5].len(), 2, "Expected 2 network interfaces");
    assert_eq!(tables[7].len(), 2, "Expected 2 global resources");
    assert_eq!(tables[8].len(), 2, "Expected 2 diagnostics");

    let mut sink = CsvSink::new(Vec::new());
    sink.write_tables(&tables).expect("Failed to write CSV");
    let csv = String::from_utf8(sink.into_inner()).unwrap();

    assert!(csv.starts_with("# VPC Topology\n"));
    assert!(csv.contains(
        "\"us-east-1\",\"vpc-1\",\"shared-services\",\"10.0.0.0/16\",\"subnet-a\",\"public-a\",\"10.0.1.0/24\",\"us-east-1a\",\"Public\",\"251\",\"Subnet\",\"3\""
    ));
    assert!(csv.contains("\"Private (Implicit)\""));
    assert!(csv.contains("# Diagnostics\n"));
    assert!(csv.contains("\"AmbiguousDefault\",\"vpc-2\""));
}

#[test]
fn test_tables_to_xlsx() {
    let snapshot = get_scan_snapshot(&cached_config()).expect("Failed to read scan cache");
    let report = build_report(&snapshot);
    let tables = report_tables(&report);

    let path = std::env::temp_dir().join("aws_topology_audit_integration.xlsx");
    let path = path.to_str().unwrap();
    XlsxSink::new(path)
        .write_tables(&tables)
        .expect("Failed to write workbook");

    let bytes = std::fs::read(path).expect("Workbook not written");
    // xlsx files are zip archives
    assert_eq!(&bytes[..2], b"PK");
    std::fs::remove_file(path).ok();
}

#[test]
fn test_busy_subnet_still_writes_workbook() {
    let mut snapshot = get_scan_snapshot(&cached_config()).expect("Failed to read scan cache");
    for n in 0..2_000 {
        snapshot.regions[0].resources.push(
            AttachedResource::new(&format!("eni-{n:017}"), ResourceKind::NetworkInterface)
                .in_subnet("subnet-b")
                .in_network("vpc-1")
                .with_detail("Resource Type", "ECS Task"),
        );
    }
    let report = build_report(&snapshot);
    let tables = report_tables(&report);
    let longest = tables[0]
        .rows
        .iter()
        .flatten()
        .map(|cell| cell.chars().count())
        .max()
        .unwrap();
    assert!(longest > 32_767, "Expected an oversized topology cell");

    let path = std::env::temp_dir().join("aws_topology_audit_busy_subnet.xlsx");
    let path = path.to_str().unwrap();
    XlsxSink::new(path)
        .write_tables(&tables)
        .expect("Failed to write workbook");
    assert!(std::fs::metadata(path).unwrap().len() > 0);
    std::fs::remove_file(path).ok();
}
