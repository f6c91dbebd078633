use super::keys;

pub(super) const ID: &[(&str, &str)] = &[
    (keys::BELOW_AVERAGE, "Kurang Baik"),
    (keys::FAIR, "Cukup"),
    (keys::GOOD, "Baik"),
    (keys::EXCELLENT, "Sangat Baik"),
    (keys::INVALID, "Tidak Valid"),
    (
        keys::VALUE_OUT_OF_RANGE,
        "Nilai harus berupa angka bulat antara 0 sampai 30.",
    ),
    (
        keys::EXPORT_FAILED,
        "Gagal membuat PDF. Silakan coba lagi.",
    ),
    (keys::MALE, "Laki-laki"),
    (keys::FEMALE, "Perempuan"),
    (keys::RESULT_TITLE, "Hasil Perhitungan"),
    (keys::FULL_NAME, "Nama Lengkap"),
    (keys::AGE, "Umur"),
    (keys::GENDER, "Jenis Kelamin"),
    (keys::MOVEMENT_TEST, "Tes Gerak"),
    (keys::OUTCOME_TEST, "Hasil Tes"),
    (keys::FINAL_TOTAL_SCORE, "Total Skor Akhir"),
    (
        keys::MSG_AFFIRMATIVE,
        "Luar biasa! Pertahankan kemampuan bermain Anda.",
    ),
    (
        keys::MSG_ENCOURAGING,
        "Terus berlatih untuk meningkatkan kemampuan Anda.",
    ),
    (keys::THANK_YOU, "Terima kasih telah mengikuti tes ini."),
    (keys::DOWNLOAD_PDF, "Unduh PDF"),
    (keys::GENERATING, "Membuat PDF..."),
    (keys::SCORE_PLACEHOLDER, "0-30"),
];

pub(super) const EN: &[(&str, &str)] = &[
    (keys::BELOW_AVERAGE, "Below Average"),
    (keys::FAIR, "Fair"),
    (keys::GOOD, "Good"),
    (keys::EXCELLENT, "Excellent"),
    (keys::INVALID, "Invalid"),
    (
        keys::VALUE_OUT_OF_RANGE,
        "Scores must be whole numbers between 0 and 30.",
    ),
    (
        keys::EXPORT_FAILED,
        "Could not generate the PDF. Please try again.",
    ),
    (keys::MALE, "Male"),
    (keys::FEMALE, "Female"),
    (keys::RESULT_TITLE, "Calculation Result"),
    (keys::FULL_NAME, "Full Name"),
    (keys::AGE, "Age"),
    (keys::GENDER, "Gender"),
    (keys::MOVEMENT_TEST, "Movement Test"),
    (keys::OUTCOME_TEST, "Outcome Test"),
    (keys::FINAL_TOTAL_SCORE, "Final Total Score"),
    (keys::MSG_AFFIRMATIVE, "Outstanding! Keep up your level of play."),
    (
        keys::MSG_ENCOURAGING,
        "Keep practicing to improve your skills.",
    ),
    (keys::THANK_YOU, "Thank you for taking the test."),
    (keys::DOWNLOAD_PDF, "Download PDF"),
    (keys::GENERATING, "Generating PDF..."),
    (keys::SCORE_PLACEHOLDER, "0-30"),
];
