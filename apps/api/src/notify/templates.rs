use chrono::NaiveDate;

/// HTML body of the welcome message.
pub fn welcome_body(full_name: &str, hire_date: NaiveDate) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background-color: #4CAF50; color: white; padding: 20px; text-align: center; }}
        .content {{ background-color: #f9f9f9; padding: 30px; }}
        .info-box {{ background-color: white; padding: 15px; margin: 20px 0; border-left: 4px solid #4CAF50; }}
        .footer {{ text-align: center; margin-top: 20px; color: #666; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header"><h1>¡Bienvenido a TalentoPlus!</h1></div>
        <div class="content">
            <h2>Hola {name},</h2>
            <p>Nos complace darte la bienvenida a <strong>TalentoPlus</strong>. Tu registro ha sido completado exitosamente.</p>
            <div class="info-box">
                <p><strong>Fecha de ingreso:</strong> {hire}</p>
            </div>
            <h3>Próximos pasos:</h3>
            <ol>
                <li>Accede a la plataforma usando tu documento y email</li>
                <li>Completa tu perfil profesional</li>
                <li>Descarga tu hoja de vida desde tu perfil</li>
            </ol>
            <p>Saludos cordiales,<br><strong>Equipo de TalentoPlus</strong></p>
        </div>
        <div class="footer"><p>Este es un correo automático, por favor no responder.</p></div>
    </div>
</body>
</html>"#,
        name = escape_html(full_name),
        hire = hire_date.format("%d/%m/%Y"),
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
