//! 结果弹窗
//!
//! 运行阶段到界面弹窗的投影，与具体界面框架无关

use crate::config::RunConfig;
use crate::error::FailureKind;
use crate::models::run_state::Phase;

pub const LOADING_MESSAGE: &str = "Generating the tests...";
pub const SUCCESS_TITLE: &str = "Screenshot tests generated successfully!";
pub const SERVER_DOWN_TITLE: &str = "Please start the test server";
pub const SERVER_DOWN_BODY: &str = "1. Navigate to \"./node_modules/screenshot-test-server/dist\"\n2. Run the command- \"node server.js\"\n3. Press the \"Capture and Compare\" button again.";
pub const GENERIC_FAILURE_TITLE: &str = "Something went wrong!";

/// 弹窗内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// 采集中，只显示加载提示，不可关闭
    Loading,
    /// 终态提示，可关闭
    Message { title: String, body: Option<String> },
}

impl Dialog {
    /// 根据当前阶段生成弹窗，`Idle` 时没有弹窗
    pub fn for_phase(phase: &Phase, config: &RunConfig) -> Option<Self> {
        match phase {
            Phase::Idle => None,
            Phase::Capturing => Some(Dialog::Loading),
            Phase::Succeeded => Some(Dialog::Message {
                title: SUCCESS_TITLE.to_string(),
                body: Some(format!(
                    "Open the file {}/test.html in your browser to see the reports.",
                    config.report_folder()
                )),
            }),
            Phase::Failed(reason) => Some(match reason.kind {
                FailureKind::ServiceUnreachable => Dialog::Message {
                    title: SERVER_DOWN_TITLE.to_string(),
                    body: Some(SERVER_DOWN_BODY.to_string()),
                },
                FailureKind::Generic => Dialog::Message {
                    title: GENERIC_FAILURE_TITLE.to_string(),
                    body: None,
                },
            }),
        }
    }

    pub fn is_dismissible(&self) -> bool {
        !matches!(self, Dialog::Loading)
    }

    pub fn title(&self) -> &str {
        match self {
            Dialog::Loading => LOADING_MESSAGE,
            Dialog::Message { title, .. } => title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::run_state::FailureReason;

    fn failed(kind: FailureKind) -> Phase {
        Phase::Failed(FailureReason {
            kind,
            message: "x".to_string(),
        })
    }

    #[test]
    fn test_idle_has_no_dialog() {
        assert_eq!(Dialog::for_phase(&Phase::Idle, &RunConfig::default()), None);
    }

    #[test]
    fn test_loading_is_not_dismissible() {
        let dialog = Dialog::for_phase(&Phase::Capturing, &RunConfig::default()).unwrap();
        assert_eq!(dialog, Dialog::Loading);
        assert!(!dialog.is_dismissible());
    }

    #[test]
    fn test_success_points_to_report_folder() {
        let dialog = Dialog::for_phase(&Phase::Succeeded, &RunConfig::default()).unwrap();
        assert_eq!(dialog.title(), SUCCESS_TITLE);
        match dialog {
            Dialog::Message { body: Some(body), .. } => {
                assert!(body.contains("screenshot-test/test.html"))
            }
            other => panic!("unexpected dialog: {:?}", other),
        }
    }

    #[test]
    fn test_failure_dialogs_distinguish_unreachable_service() {
        let config = RunConfig::default();

        let down = Dialog::for_phase(&failed(FailureKind::ServiceUnreachable), &config).unwrap();
        assert_eq!(down.title(), SERVER_DOWN_TITLE);
        assert!(down.is_dismissible());

        let generic = Dialog::for_phase(&failed(FailureKind::Generic), &config).unwrap();
        assert_eq!(
            generic,
            Dialog::Message {
                title: GENERIC_FAILURE_TITLE.to_string(),
                body: None
            }
        );
    }
}
