//! Built-in word lists, FAQ tables, and canned replies.
//!
//! Every list here is only a default: the matching config key replaces it.

// Classifier lists.

pub const BLOCKED_WORDS: &[&str] = &["시발", "씨발", "ㅅㅂ", "병신", "개새끼", "좆", "fuck", "shit"];

pub const INJECTION_KEYWORDS: &[&str] = &["위 명령 무시", "무시하고", "명령을 바꿔", "너는 이제", "지금부터", "system:"];

pub const GRATITUDE_WORDS: &[&str] = &["고맙", "고마워", "thanks", "감사"];

pub const HELP_ALIASES: &[&str] = &["도움", "헬프", "help"];

// Router keyword lists.

pub const PAIRING_KEYWORDS: &[&str] = &["!마니또", "마니또", "마니띠", "이번 주 마니또"];

pub const NOTICE_KEYWORDS: &[&str] = &["!공지", "공지", "공지사항", "최근 공지", "무슨 공지", "무슨 소식", "최근 소식"];

pub const PAUSE_KEYWORDS: &[&str] = &["!정지", "멈춰", "말하지 마", "잠깐 쉬어"];

// Commands.

pub const INQUIRY_COMMAND: &str = "!문의";
pub const OPERATOR_INQUIRY_COMMAND: &str = "!문의-운영진";
pub const INQUIRY_CHANNEL_PREFIX: &str = "문의";
pub const OPERATOR_ROLE_NAME: &str = "운영진";

// FAQ tables.

/// Short-form FAQ used for exact/fuzzy answers and as LLM context.
pub const FAQ: &[(&str, &str)] = &[
    ("마롱이 뭐야", "마롱은 그룹 친구들과 매주 마니또를 정해 몰래 챙겨주는 서비스예요. 그룹을 만들고 친구를 초대해 보세요!"),
    ("회원가입", "앱 첫 화면에서 카카오 또는 구글 계정으로 간편하게 가입할 수 있어요."),
    ("그룹 만들기", "홈 화면의 '+' 버튼을 눌러 그룹 이름과 소개를 입력하면 그룹이 만들어져요."),
    ("초대 코드", "그룹 설정 화면에서 6자리 초대 코드를 확인하고 친구에게 공유할 수 있어요."),
    ("마니또 매칭", "매주 월요일 0시에 그룹 안에서 새로운 마니또가 자동으로 매칭돼요."),
    ("미션", "매주 마니또에게 줄 수 있는 미션이 제공돼요. 미션을 완료하면 기록에 남아요."),
    ("알림", "설정 > 알림에서 마니또 공개, 미션, 공지 알림을 각각 켜고 끌 수 있어요."),
    ("탈퇴", "설정 > 계정 관리 > 회원 탈퇴에서 진행할 수 있어요. 탈퇴 시 모든 그룹 기록이 삭제돼요."),
];

/// Extended keyword guide shown by the help command.
pub const HELP_FAQ: &[(&str, &str)] = &[
    ("마롱이 뭐야", "마롱 서비스 소개를 알려드려요."),
    ("회원가입", "가입 방법을 안내해 드려요."),
    ("그룹 만들기", "새 그룹을 만드는 방법을 알려드려요."),
    ("초대 코드", "친구를 그룹에 초대하는 방법을 알려드려요."),
    ("마니또 매칭", "마니또가 언제, 어떻게 정해지는지 알려드려요."),
    ("이번 주 마니또", "이번 주 나의 마니띠를 알려드려요."),
    ("미션", "주간 미션에 대해 알려드려요."),
    ("알림", "알림 설정 방법을 알려드려요."),
    ("공지", "최근 공지사항을 요약해 드려요."),
    ("멈춰", "잠시 동안 챗봇의 응답을 멈춰요. 예) `멈춰 5`"),
    ("탈퇴", "회원 탈퇴 방법을 알려드려요."),
    ("!문의", "챗봇과 1:1 문의 채널을 만들어요."),
    ("!문의-운영진", "운영진과 비밀 문의 채널을 만들어요."),
];

// Canned replies.

pub const BLOCKED_REPLY: &str = "⚠️ 부적절한 표현은 삼가주세요.";
pub const INJECTION_REPLY: &str = "⚠️ 보안상의 이유로 해당 요청은 처리할 수 없습니다.";
pub const GRATITUDE_REPLY: &str = "천만에요! 😊 언제든 도와드릴게요.";

pub const HELP_FIRST_TITLE: &str = "마롱 사용 가이드";
pub const HELP_NEXT_TITLE: &str = "📄 추가 키워드 안내";
pub const HELP_DESCRIPTION: &str = "아래 키워드를 입력하면 관련 정보를 알려드려요:";
pub const HELP_COLOR: u32 = 0x6cc644;

pub const NOTICE_EMPTY_REPLY: &str = "📭 공지사항이 아직 없습니다.";
pub const NOTICE_NO_GUILD_REPLY: &str = "📛 공지 분석 실패: 서버 정보를 찾을 수 없습니다.";
pub const NOTICE_NO_CHANNEL_REPLY: &str = "📛 공지 채널을 찾을 수 없습니다.";
pub const NOTICE_ATTACHMENT_PLACEHOLDER: &str = "[첨부파일/임베드 포함]";

pub const INQUIRY_NO_GUILD_REPLY: &str = "📛 문의 채널은 서버 안에서만 만들 수 있어요.";

pub const WELCOME_GUIDE_HEADER: &str = "📖 **마롱 이용 가이드 (FAQ)**";
