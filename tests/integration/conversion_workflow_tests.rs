/*!
 * End-to-end conversion workflow tests
 */

use anyhow::Result;
use capmark::app_config::Config;
use capmark::app_controller::Controller;
use capmark::file_utils::FileManager;
use crate::common;

/// Test converting a SAMI file to SRT on disk
#[test]
fn test_run_withSamiFile_shouldWriteSrtOutput() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;

    let controller = Controller::new_for_test()?;
    controller.run(input, temp_dir.path().to_path_buf(), None, false)?;

    let output = temp_dir.path().join("movie.en.srt");
    assert!(FileManager::file_exists(&output));

    let srt = FileManager::read_to_string(&output)?;
    assert!(srt.contains("1\n00:00:00,900 --> 00:00:03,960\naaaa\n"));
    assert!(srt.contains("2\n00:00:03,960 --> 00:00:06,960\nbbb\n"));

    Ok(())
}

/// Test that existing outputs are skipped without the force flag
#[test]
fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;
    let output = temp_dir.path().join("movie.en.srt");

    common::create_test_file(temp_dir.path(), "movie.en.srt", "sentinel")?;

    let controller = Controller::new_for_test()?;
    controller.run(input.clone(), temp_dir.path().to_path_buf(), None, false)?;
    assert_eq!(FileManager::read_to_string(&output)?, "sentinel");

    controller.run(input, temp_dir.path().to_path_buf(), None, true)?;
    assert_ne!(FileManager::read_to_string(&output)?, "sentinel");

    Ok(())
}

/// Test that a track selection by language converts only that track
#[test]
fn test_run_withLanguageSelection_shouldWriteOnlyMatchingTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.smi", common::sami_two_languages())?;

    let controller = Controller::new_for_test()?;
    controller.run(input, temp_dir.path().to_path_buf(), Some("fr"), false)?;

    assert!(FileManager::file_exists(temp_dir.path().join("movie.fr.srt")));
    assert!(!FileManager::file_exists(temp_dir.path().join("movie.en.srt")));

    Ok(())
}

/// Test that requesting a missing track is an error
#[test]
fn test_run_withMissingLanguage_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;

    let controller = Controller::new_for_test()?;
    let result = controller.run(input, temp_dir.path().to_path_buf(), Some("de"), false);

    assert!(result.is_err());
    Ok(())
}

/// Test converting a whole folder of mixed subtitle files
#[test]
fn test_run_folder_withMixedFiles_shouldConvertEverything() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_sami(dir, "one.smi")?;
    common::create_test_srt(dir, "two.srt")?;
    common::create_test_file(dir, "ignored.txt", "not captions")?;

    let controller = Controller::new_for_test()?;
    controller.run_folder(dir.to_path_buf(), false)?;

    assert!(FileManager::file_exists(dir.join("one.en.srt")));
    assert!(FileManager::file_exists(dir.join("two.en.srt")));
    assert!(!FileManager::file_exists(dir.join("ignored.en.srt")));

    Ok(())
}

/// Test that a failing file does not abort folder processing
#[test]
fn test_run_folder_withOneBadFile_shouldProcessTheRest() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_file(dir, "bad.srt", "no valid blocks here")?;
    common::create_test_sami(dir, "good.smi")?;

    let controller = Controller::new_for_test()?;
    controller.run_folder(dir.to_path_buf(), false)?;

    assert!(FileManager::file_exists(dir.join("good.en.srt")));
    Ok(())
}

/// Test JSON export of parsed markers
#[test]
fn test_parse_to_json_withSamiFile_shouldSerializeTracks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;

    let controller = Controller::new_for_test()?;
    let json = controller.parse_to_json(&input)?;

    let value: serde_json::Value = serde_json::from_str(&json)?;
    let tracks = value.as_array().expect("tracks should be an array");
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0]["language"], "EN");
    assert_eq!(tracks[0]["markers"][0]["position_ms"], 900);
    assert_eq!(tracks[0]["markers"][0]["duration_ms"], 3060);
    assert_eq!(tracks[0]["markers"][1]["duration_ms"], serde_json::Value::Null);

    Ok(())
}

/// Test track listing for an SRT file labelled with the configured language
#[test]
fn test_list_tracks_withSrtFileAndCustomLanguage_shouldUseConfig() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_srt(temp_dir.path(), "movie.srt")?;

    let mut config = Config::default();
    config.default_language = "fr".to_string();

    let controller = Controller::with_config(config)?;
    let tracks = controller.list_tracks(&input)?;

    assert_eq!(tracks, vec![("FR".to_string(), 5)]);
    Ok(())
}
