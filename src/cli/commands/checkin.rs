use crate::cli::commands::open_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::attempt::{CheckinAttempt, CheckinTarget, Identity};
use crate::models::coordinate::Coordinate;
use crate::ui::messages::{success, warning};
use crate::utils::formatting::format_distance;

/// Submit a check-in. A recorded `absent` is still a successful command.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin {
        token,
        event,
        lat,
        lng,
        accuracy,
        user,
        student,
        device,
    } = cmd
    {
        let target = match (token, event) {
            (Some(t), _) => CheckinTarget::Token(t.clone()),
            (None, Some(id)) => CheckinTarget::Event(*id),
            (None, None) => {
                return Err(AppError::PreconditionFailed(
                    "a token or --event is required".into(),
                ));
            }
        };

        let mut attempt = CheckinAttempt::new(Coordinate::new(*lat, *lng)?, *accuracy)?;
        if let Some(u) = user {
            let mut identity = Identity::new(u.as_str());
            if let Some(s) = student {
                identity = identity.with_student_number(s.as_str());
            }
            attempt = attempt.by(identity);
        }
        if let Some(d) = device {
            attempt = attempt.with_device(d.as_str());
        }

        let mut service = open_service(cfg)?;
        let record = service.submit_checkin(&target, &attempt)?;

        if record.is_present() {
            success("Check-in successful! You are marked present.");
        } else {
            warning(format!(
                "Check-in recorded, but you are outside the allowed radius ({} from venue). Status: Absent",
                format_distance(record.distance_m)
            ));
        }
        println!(
            "status: {} | distance: {}m | record: {}",
            record.status.to_db_str(),
            record.distance_str(),
            record.id
        );
    }
    Ok(())
}
