//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 合成采集 e2e 测试（无需功率计和设备）

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{AnalysisConfig, SinkType, SyncGeometry};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_default_config_survives_toml() {
        let config = AnalysisConfig::default();
        let toml = ConfigLoader::to_toml(&config).unwrap();
        let parsed = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();

        assert_eq!(parsed.sync, SyncGeometry::default());
        assert_eq!(parsed.files, config.files);
        assert_eq!(parsed.sinks, config.sinks);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
[sync]
sync_blocks = 2
edges_per_block = 4

[[sinks]]
name = "console"
sink_type = "log"
"#;
        let config = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.sync.total_edges(), 8);
        assert_eq!(config.sync.log_entries_per_pulse, 2);
        assert_eq!(config.sinks.len(), 1);
        assert_eq!(config.sinks[0].sink_type, SinkType::Log);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::Path;

    use chrono::{NaiveDate, NaiveDateTime};
    use contracts::{
        AnalysisReport, FileLayout, PinState, RunInfo, SinkConfig, SinkType, SyncGeometry,
    };
    use dispatcher::{
        create_dispatcher, DispatchSummary, DispatcherError, OutputPaths, SECTIONS_HEADER,
    };
    use ingestion::{
        derive_output_path, load_inputs, most_recent_file, SyntheticCapture, SyntheticConfig,
        SyntheticOperation,
    };
    use observability::SectionMetricsAggregator;
    use sync_engine::{SyncEngine, SyncError, TraceEnd};
    use tokio::sync::mpsc;

    const TOLERANCE: f64 = 1e-6;

    fn capture_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn operations() -> Vec<SyntheticOperation> {
        vec![
            SyntheticOperation::new("idle", 1.0, 60),
            SyntheticOperation::new("hash", 0.5, 400),
            SyntheticOperation::new("upload", 0.3, 250),
        ]
    }

    fn sinks() -> Vec<SinkConfig> {
        [
            ("sections", SinkType::SectionsCsv),
            ("info", SinkType::InfoJson),
            ("console", SinkType::Log),
        ]
        .into_iter()
        .map(|(name, sink_type)| SinkConfig {
            name: name.to_string(),
            sink_type,
            queue_capacity: 1,
        })
        .collect()
    }

    fn outputs_for(raw: &Path, layout: &FileLayout) -> OutputPaths {
        OutputPaths {
            sections: derive_output_path(raw, &layout.raw_suffix, &layout.sections_suffix).unwrap(),
            info: derive_output_path(raw, &layout.raw_suffix, &layout.info_suffix).unwrap(),
        }
    }

    async fn dispatch(
        report: AnalysisReport,
        outputs: OutputPaths,
    ) -> Result<DispatchSummary, DispatcherError> {
        let (tx, rx) = mpsc::channel(1);
        let task = create_dispatcher(sinks(), outputs, rx).unwrap().spawn();
        tx.send(report).await.unwrap();
        drop(tx);
        task.await.unwrap()
    }

    /// End-to-end: synthetic files -> load -> analyze -> sinks
    ///
    /// 验证完整的数据流：
    /// 1. 按测量目录约定写出 scenario / RAW / ANDROID 文件
    /// 2. 按最新时间戳定位 RAW 文件并推导输出路径
    /// 3. SyncEngine 计算时钟偏移并逐操作积分能耗
    /// 4. Dispatcher 写出 sections.csv 与 info.json
    #[tokio::test]
    async fn test_e2e_synthetic_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let layout = FileLayout::default();
        let config = SyntheticConfig::default();
        let capture = SyntheticCapture::generate(&config, &operations());
        let paths = capture
            .write_to(dir.path(), &config.scenario, capture_time(), &layout)
            .await
            .unwrap();

        let raw = most_recent_file(dir.path(), &config.scenario, &layout.raw_suffix)
            .unwrap()
            .unwrap();
        assert_eq!(raw, paths.raw);

        let inputs = load_inputs(&paths).await.unwrap();
        let report = SyncEngine::default()
            .analyze(&inputs.scenario, &inputs.samples, &inputs.events)
            .unwrap();

        assert!((report.info.clock_offset + config.clock_offset_s).abs() < TOLERANCE);
        assert!(report.info.clock_offset_stdev < TOLERANCE);
        assert_eq!(report.info.sync_pairs, 8);
        assert_eq!(report.info.rising_edges, 8);
        assert_eq!(report.info.falling_edges, 8);
        assert_eq!(report.info.sections, 3);
        assert_eq!(report.info.empty_sections, 0);

        for (row, window) in report.rows.iter().zip(&capture.windows) {
            assert_eq!(row.name, window.name);
            assert!((row.start - window.first_sample).abs() < TOLERANCE);
            assert!((row.end - window.last_sample).abs() < TOLERANCE);
            assert!((row.power_avg - window.power_mw as f64).abs() < TOLERANCE);
            assert!((row.energy - window.energy()).abs() < TOLERANCE);
        }

        let mut aggregator = SectionMetricsAggregator::new();
        for row in &report.rows {
            aggregator.update(row);
        }
        let summary = aggregator.summary();
        assert_eq!(summary.total_sections, 3);
        assert_eq!(summary.empty_sections, 0);

        let outputs = outputs_for(&paths.raw, &layout);
        let dispatched = dispatch(report, outputs.clone()).await.unwrap();
        assert_eq!(dispatched.reports, 1);
        assert_eq!(dispatched.sinks.len(), 3);
        for (_, snapshot) in &dispatched.sinks {
            assert_eq!(snapshot.write_count, 1);
            assert_eq!(snapshot.failure_count, 0);
        }

        let sections = std::fs::read_to_string(&outputs.sections).unwrap();
        let lines: Vec<&str> = sections.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], SECTIONS_HEADER);
        assert_eq!(lines[1], "1.7500,2.7400,idle,60.0000,59.4000,iteration=0");
        assert_eq!(lines[2], "2.9500,3.4400,hash,400.0000,196.0000,iteration=1");

        let info: RunInfo =
            serde_json::from_str(&std::fs::read_to_string(&outputs.info).unwrap()).unwrap();
        assert_eq!(info.sections, 3);
        assert!((info.clock_offset + config.clock_offset_s).abs() < TOLERANCE);
    }

    #[tokio::test]
    async fn test_negative_device_offset() {
        let config = SyntheticConfig {
            clock_offset_s: -250.0,
            ..Default::default()
        };
        let capture = SyntheticCapture::generate(&config, &operations());
        let report = SyncEngine::default()
            .analyze(&scenario_of(&capture), &capture.samples, &capture.events)
            .unwrap();

        assert!((report.info.clock_offset - 250.0).abs() < TOLERANCE);
        assert!((report.rows[1].power_avg - 400.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_custom_geometry() {
        let geometry = SyncGeometry {
            sync_blocks: 2,
            edges_per_block: 4,
            log_entries_per_pulse: 1,
            sync_operation: "pulse".to_string(),
        };
        let config = SyntheticConfig {
            geometry: geometry.clone(),
            ..Default::default()
        };
        let capture = SyntheticCapture::generate(&config, &operations());
        assert_eq!(capture.events.len(), 8 + 3);

        let report = SyncEngine::new(geometry)
            .analyze(&scenario_of(&capture), &capture.samples, &capture.events)
            .unwrap();
        assert_eq!(report.info.sync_pairs, 8);
        assert_eq!(report.rows.len(), 3);
        assert!(report.rows.iter().all(|row| !row.empty));
    }

    #[test]
    fn test_missing_log_row_is_rejected() {
        let capture = SyntheticCapture::generate(&SyntheticConfig::default(), &operations());
        let mut events = capture.events.clone();
        events.pop();

        let err = SyncEngine::default()
            .analyze(&scenario_of(&capture), &capture.samples, &events)
            .unwrap_err();
        assert_eq!(
            err,
            SyncError::CountMismatch {
                scenario_operations: 3,
                sync_entries: 16,
                android_entries: 18,
            }
        );
    }

    #[test]
    fn test_trace_ending_high_is_rejected() {
        let capture = SyntheticCapture::generate(&SyntheticConfig::default(), &operations());
        let mut samples = capture.samples.clone();
        if let Some(last) = samples.last_mut() {
            last.pin_state = PinState::High;
        }

        let err = SyncEngine::default()
            .analyze(&scenario_of(&capture), &samples, &capture.events)
            .unwrap_err();
        assert!(matches!(err, SyncError::PinNotLow { end: TraceEnd::Last, .. }));
    }

    #[tokio::test]
    async fn test_unwritable_output_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let capture = SyntheticCapture::generate(&SyntheticConfig::default(), &operations());
        let report = SyncEngine::default()
            .analyze(&scenario_of(&capture), &capture.samples, &capture.events)
            .unwrap();

        // a directory cannot be overwritten by the sections file
        let outputs = OutputPaths {
            sections: dir.path().to_path_buf(),
            info: dir.path().join("run_info.json"),
        };
        let err = dispatch(report, outputs.clone()).await.unwrap_err();
        match err {
            DispatcherError::SinkFailures { sinks } => assert_eq!(sinks, ["sections"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(outputs.info.exists());
    }

    fn scenario_of(capture: &SyntheticCapture) -> Vec<contracts::ScenarioOperation> {
        ingestion::parse_scenario(&capture.scenario_file).unwrap()
    }
}
