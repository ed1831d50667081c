use crate::{
    error::AppError::{self, MissingFields},
    models::{ContactForm, Submission},
};

fn required(field: &'static str, value: Option<String>) -> Result<String, AppError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or(MissingFields(field))
}

pub fn get_submission(form: ContactForm) -> Result<Submission, AppError> {
    Ok(Submission {
        full_name: required("fullName", form.full_name)?,
        email: required("email", form.email)?,
        phone_number: required("phoneNumber", form.phone_number)?,
        message: required("message", form.message)?,
    })
}
